use chrono::NaiveDate;
use thiserror::Error;

use crate::models::entry::MealSlot;

/// Domain errors raised by the diary core, the store and the product client.
#[derive(Debug, Error)]
pub enum DietError {
    #[error("product not found")]
    ProductNotFound,

    #[error("invalid serving size: {0:?} (expected grams > 0)")]
    InvalidServingSize(String),

    #[error("no entry at {slot}[{index}] on {date}")]
    EntryNotFound {
        date: NaiveDate,
        slot: MealSlot,
        index: usize,
    },

    #[error("no entry with id {0}")]
    UnknownEntry(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("diary ledger is closed")]
    LedgerClosed,
}

impl DietError {
    pub fn external(service: &str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProductNotFound => "product_not_found",
            Self::InvalidServingSize(_) => "invalid_serving_size",
            Self::EntryNotFound { .. } | Self::UnknownEntry(_) => "entry_not_found",
            Self::InvalidProfile(_) => "invalid_profile",
            Self::InvalidInput(_) => "invalid_input",
            Self::ExternalService { .. } => "external_service_error",
            Self::Storage(_) => "storage_error",
            Self::LedgerClosed => "ledger_closed",
        }
    }
}

impl From<rusqlite::Error> for DietError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Map an `anyhow` error to the envelope code of its root `DietError`, if any.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<DietError>())
        .map(DietError::code)
        .unwrap_or("general_error")
}
