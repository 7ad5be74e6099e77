use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("Cannot parse {field}: '{value}' — {reason}")]
    Parse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Arithmetic overflow: {context}")]
    Overflow { context: String },

    #[error("No loan record with id {0}")]
    NotFound(i64),

    #[error("Stored loan {id} is unreadable: {reason}")]
    CorruptRecord { id: i64, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub(crate) fn empty_field(field: &str) -> Self {
        LedgerError::Validation {
            field: field.into(),
            reason: "Field is required".into(),
        }
    }

    /// True for the input-side failures a form should simply reject.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation { .. })
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

#[cfg(feature = "storage")]
impl From<rusqlite::Error> for LedgerError {
    fn from(e: rusqlite::Error) -> Self {
        LedgerError::Storage(e.to_string())
    }
}
