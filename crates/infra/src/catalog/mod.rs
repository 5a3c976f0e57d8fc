//! Read-side port the forecast runner pulls catalog data through.
//!
//! Adapters:
//! - `in_memory`: tenant-isolated maps, for dev and tests
//! - `postgres`: runtime `sqlx` queries against the catalog tables

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use sellerdesk_core::TenantId;
use sellerdesk_replenishment::{CatalogSnapshot, SeasonalEvent};

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Catalog read failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    /// The backing data is not provisioned for this deployment/tenant.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Tenant-scoped catalog reads for one forecast run.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Every mapping on `channel` (active or not) joined with its product,
    /// inventory and velocity records, ordered by SKU.
    async fn load_snapshot(&self, tenant_id: TenantId, channel: &str) -> Result<CatalogSnapshot, StoreError>;

    /// The tenant's seasonal event calendar.
    async fn seasonal_events(&self, tenant_id: TenantId) -> Result<Vec<SeasonalEvent>, StoreError>;
}

#[async_trait]
impl<T> CatalogReader for std::sync::Arc<T>
where
    T: CatalogReader + ?Sized,
{
    async fn load_snapshot(&self, tenant_id: TenantId, channel: &str) -> Result<CatalogSnapshot, StoreError> {
        (**self).load_snapshot(tenant_id, channel).await
    }

    async fn seasonal_events(&self, tenant_id: TenantId) -> Result<Vec<SeasonalEvent>, StoreError> {
        (**self).seasonal_events(tenant_id).await
    }
}
