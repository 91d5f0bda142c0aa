pub mod export;
pub mod lease_accounting;
pub mod treasury;
