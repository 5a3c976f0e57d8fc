//! Catalog records as read from the store, one snapshot per run.
//!
//! These mirror the relational rows the infra layer reads. The engine never
//! mutates them and never writes anything back.

use serde::{Deserialize, Serialize};

use sellerdesk_core::ProductId;

/// How a product participates in the variation tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductClass {
    /// A standalone, directly sellable product.
    Leaf,
    /// A variation container; never stocked itself.
    Parent,
    /// A child variation of some parent; sellable.
    Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: ProductId,
    pub sku: String,
    pub title: String,
    /// Explicit parent flag as set by the catalog import.
    pub is_parent: bool,
    pub parent_sku: Option<String>,
    /// Number of child variations pointing at this product.
    pub variation_count: u32,
    /// Supplier lead time, in days.
    pub lead_time_days: u32,
}

impl ProductRecord {
    /// Resolve the product's class once.
    ///
    /// A product is a parent when flagged as such, or when it has no parent of
    /// its own but at least one child variation points at it.
    pub fn classify(&self) -> ProductClass {
        if self.is_parent {
            return ProductClass::Parent;
        }
        match &self.parent_sku {
            Some(_) => ProductClass::Variant,
            None if self.variation_count > 0 => ProductClass::Parent,
            None => ProductClass::Leaf,
        }
    }
}

/// A SKU's listing on one sales channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuChannelMapping {
    pub sku: String,
    pub channel: String,
    pub product_id: Option<ProductId>,
    /// Units/day observed on this channel, when the channel reports one.
    pub channel_velocity: Option<f64>,
    pub active: bool,
}

/// Fulfillment-network inventory for a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub sku: String,
    pub available: i64,
    pub inbound_working: i64,
    pub inbound_shipped: i64,
    pub inbound_receiving: i64,
}

/// Global (all-channel) sales velocity for a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub sku: String,
    /// Average units/day over the trailing 30 days.
    pub velocity_30d: f64,
    /// Units sold over the trailing 30 days (diagnostic only).
    pub units_sold_30d: i64,
}

/// One mapping joined with its linked records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub mapping: SkuChannelMapping,
    pub product: Option<ProductRecord>,
    pub inventory: Option<InventoryRecord>,
    pub velocity: Option<VelocityRecord>,
}

/// Everything the loader needs for one run, in store order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub rows: Vec<CatalogRow>,
}

impl CatalogSnapshot {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(is_parent: bool, parent_sku: Option<&str>, variation_count: u32) -> ProductRecord {
        ProductRecord {
            product_id: ProductId::new(),
            sku: "SKU".to_string(),
            title: "Widget".to_string(),
            is_parent,
            parent_sku: parent_sku.map(str::to_string),
            variation_count,
            lead_time_days: 14,
        }
    }

    #[test]
    fn explicit_flag_wins() {
        assert_eq!(product(true, Some("P"), 0).classify(), ProductClass::Parent);
    }

    #[test]
    fn rootless_product_with_variations_is_parent() {
        assert_eq!(product(false, None, 3).classify(), ProductClass::Parent);
    }

    #[test]
    fn child_and_standalone_products() {
        assert_eq!(product(false, Some("P"), 0).classify(), ProductClass::Variant);
        assert_eq!(product(false, None, 0).classify(), ProductClass::Leaf);
    }
}
