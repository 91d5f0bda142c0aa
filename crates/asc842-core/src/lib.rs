pub mod error;
pub mod export;
pub mod format;
pub mod lease_accounting;
pub mod time_value;
pub mod types;

pub use error::LeaseAccountingError;
pub use types::*;

/// Standard result type for all lease accounting operations
pub type LeaseAccountingResult<T> = Result<T, LeaseAccountingError>;
