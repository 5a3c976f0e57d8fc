use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use sellerdesk_core::{ProductId, TenantId};
use sellerdesk_replenishment::{
    CatalogRow, CatalogSnapshot, InventoryRecord, ProductRecord, SeasonalEvent, SkuChannelMapping,
    VelocityRecord,
};

use super::{CatalogReader, StoreError};
use crate::read_model::{InMemoryTenantStore, TenantStore};

/// In-memory catalog for tests/dev.
///
/// Mappings are keyed by `(channel, sku)`; inventory and velocity by SKU;
/// products by id; seasonal events by name.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: InMemoryTenantStore<ProductId, ProductRecord>,
    mappings: InMemoryTenantStore<(String, String), SkuChannelMapping>,
    inventory: InMemoryTenantStore<String, InventoryRecord>,
    velocity: InMemoryTenantStore<String, VelocityRecord>,
    seasonal_events: InMemoryTenantStore<String, SeasonalEvent>,
    seasonal_unprovisioned: RwLock<HashSet<TenantId>>,
    failing: RwLock<HashSet<TenantId>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_product(&self, tenant_id: TenantId, product: ProductRecord) {
        self.products.upsert(tenant_id, product.product_id, product);
    }

    pub fn upsert_mapping(&self, tenant_id: TenantId, mapping: SkuChannelMapping) {
        self.mappings
            .upsert(tenant_id, (mapping.channel.clone(), mapping.sku.clone()), mapping);
    }

    pub fn upsert_inventory(&self, tenant_id: TenantId, record: InventoryRecord) {
        self.inventory.upsert(tenant_id, record.sku.clone(), record);
    }

    pub fn upsert_velocity(&self, tenant_id: TenantId, record: VelocityRecord) {
        self.velocity.upsert(tenant_id, record.sku.clone(), record);
    }

    pub fn upsert_seasonal_event(&self, tenant_id: TenantId, event: SeasonalEvent) {
        self.seasonal_events.upsert(tenant_id, event.name.clone(), event);
    }

    /// Make `seasonal_events` report the feed as not provisioned for a tenant.
    pub fn set_seasonal_unprovisioned(&self, tenant_id: TenantId, unprovisioned: bool) {
        toggle(&self.seasonal_unprovisioned, tenant_id, unprovisioned);
    }

    /// Make `load_snapshot` fail for a tenant, as a dropped connection would.
    pub fn set_failing(&self, tenant_id: TenantId, failing: bool) {
        toggle(&self.failing, tenant_id, failing);
    }
}

fn toggle(set: &RwLock<HashSet<TenantId>>, tenant_id: TenantId, on: bool) {
    if let Ok(mut set) = set.write() {
        if on {
            set.insert(tenant_id);
        } else {
            set.remove(&tenant_id);
        }
    }
}

fn contains(set: &RwLock<HashSet<TenantId>>, tenant_id: TenantId) -> bool {
    set.read().map(|s| s.contains(&tenant_id)).unwrap_or(false)
}

#[async_trait]
impl CatalogReader for InMemoryCatalogStore {
    async fn load_snapshot(&self, tenant_id: TenantId, channel: &str) -> Result<CatalogSnapshot, StoreError> {
        if contains(&self.failing, tenant_id) {
            return Err(StoreError::Database("catalog store unreachable".to_string()));
        }

        let rows = self
            .mappings
            .sorted_values(tenant_id)
            .into_iter()
            .filter(|m| m.channel == channel)
            .map(|mapping| {
                let product = mapping
                    .product_id
                    .and_then(|id| self.products.get(tenant_id, &id));
                let inventory = self.inventory.get(tenant_id, &mapping.sku);
                let velocity = self.velocity.get(tenant_id, &mapping.sku);
                CatalogRow {
                    mapping,
                    product,
                    inventory,
                    velocity,
                }
            })
            .collect();

        Ok(CatalogSnapshot::new(rows))
    }

    async fn seasonal_events(&self, tenant_id: TenantId) -> Result<Vec<SeasonalEvent>, StoreError> {
        if contains(&self.seasonal_unprovisioned, tenant_id) {
            return Err(StoreError::Unavailable("seasonal events not provisioned".to_string()));
        }
        Ok(self.seasonal_events.sorted_values(tenant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &InMemoryCatalogStore, tenant: TenantId, sku: &str, channel: &str) {
        let product_id = ProductId::new();
        store.upsert_product(
            tenant,
            ProductRecord {
                product_id,
                sku: sku.to_string(),
                title: sku.to_string(),
                is_parent: false,
                parent_sku: None,
                variation_count: 0,
                lead_time_days: 21,
            },
        );
        store.upsert_mapping(
            tenant,
            SkuChannelMapping {
                sku: sku.to_string(),
                channel: channel.to_string(),
                product_id: Some(product_id),
                channel_velocity: Some(3.0),
                active: true,
            },
        );
        store.upsert_inventory(
            tenant,
            InventoryRecord {
                sku: sku.to_string(),
                available: 10,
                inbound_working: 0,
                inbound_shipped: 0,
                inbound_receiving: 0,
            },
        );
    }

    #[tokio::test]
    async fn snapshot_is_channel_filtered_sorted_and_joined() {
        let store = InMemoryCatalogStore::new();
        let t = TenantId::new();
        seed(&store, t, "B-2", "amazon");
        seed(&store, t, "A-1", "amazon");
        seed(&store, t, "C-3", "walmart");

        let snap = store.load_snapshot(t, "amazon").await.unwrap();
        let skus: Vec<&str> = snap.rows.iter().map(|r| r.mapping.sku.as_str()).collect();
        assert_eq!(skus, vec!["A-1", "B-2"]);
        assert!(snap.rows.iter().all(|r| r.product.is_some() && r.inventory.is_some()));
        assert!(snap.rows.iter().all(|r| r.velocity.is_none()));
    }

    #[tokio::test]
    async fn tenants_are_isolated() {
        let store = InMemoryCatalogStore::new();
        let a = TenantId::new();
        let b = TenantId::new();
        seed(&store, a, "A-1", "amazon");

        assert_eq!(store.load_snapshot(a, "amazon").await.unwrap().rows.len(), 1);
        assert!(store.load_snapshot(b, "amazon").await.unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn failure_switches_surface_as_store_errors() {
        let store = InMemoryCatalogStore::new();
        let t = TenantId::new();

        store.set_seasonal_unprovisioned(t, true);
        assert!(matches!(
            store.seasonal_events(t).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_seasonal_unprovisioned(t, false);
        assert_eq!(store.seasonal_events(t).await, Ok(vec![]));

        store.set_failing(t, true);
        assert!(matches!(
            store.load_snapshot(t, "amazon").await,
            Err(StoreError::Database(_))
        ));
    }
}
