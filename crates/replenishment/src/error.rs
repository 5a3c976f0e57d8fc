use thiserror::Error;

use sellerdesk_core::DomainError;

/// Failure of a forecast run.
///
/// Either variant aborts the whole run; there is no partial-result path.
/// Degraded seasonality and skipped SKUs are not errors and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplenishmentError {
    #[error("invalid forecast configuration: {0}")]
    InvalidConfig(#[from] DomainError),

    /// Required catalog data (mappings, products, inventory, velocity) could not be read.
    #[error("data access failed: {0}")]
    DataAccess(String),
}

impl ReplenishmentError {
    pub fn data_access(msg: impl Into<String>) -> Self {
        Self::DataAccess(msg.into())
    }
}
