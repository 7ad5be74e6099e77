pub mod error;
pub mod form;
pub mod id_pool;
pub mod payment;
pub mod presentation;
pub mod types;

#[cfg(feature = "storage")]
pub mod repository;

#[cfg(feature = "storage")]
pub mod schema;

pub use error::LedgerError;
pub use types::*;

/// Standard result type for all loan-ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
