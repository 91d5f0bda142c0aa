pub mod amortization;
pub mod classification;
pub mod fiscal;
pub mod journal;
pub mod recognition;
pub mod remeasurement;
pub mod treasury;
pub mod unified;
pub mod validation;
