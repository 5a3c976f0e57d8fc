//! Postgres-backed catalog reads.
//!
//! Schema lives in `crates/infra/migrations/0001_replenishment.sql`. Every
//! query is scoped by `tenant_id`.
//!
//! ## Error mapping
//!
//! | SQLx error | SQLSTATE | `StoreError` |
//! |---|---|---|
//! | `Database` | `42P01` (undefined table) | `Unavailable` |
//! | `Database` | other | `Database` |
//! | `PoolClosed` / other | N/A | `Database` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{instrument, Span};
use uuid::Uuid;

use sellerdesk_core::{ProductId, TenantId};
use sellerdesk_replenishment::{
    CatalogRow, CatalogSnapshot, InventoryRecord, ProductRecord, SeasonalEvent, SkuChannelMapping,
    VelocityRecord,
};

use super::{CatalogReader, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogStore {
    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid(), row_count), err)]
    async fn load_snapshot(&self, tenant_id: TenantId, channel: &str) -> Result<CatalogSnapshot, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                m.sku,
                m.channel,
                m.product_id,
                m.channel_velocity,
                m.active,
                p.product_id      AS p_product_id,
                p.sku             AS p_sku,
                p.title           AS p_title,
                p.is_parent       AS p_is_parent,
                p.parent_sku      AS p_parent_sku,
                p.variation_count AS p_variation_count,
                p.lead_time_days  AS p_lead_time_days,
                i.available,
                i.inbound_working,
                i.inbound_shipped,
                i.inbound_receiving,
                v.velocity_30d,
                v.units_sold_30d
            FROM sku_channel_mappings m
            LEFT JOIN products p
                ON p.tenant_id = m.tenant_id AND p.product_id = m.product_id
            LEFT JOIN fulfillment_inventory i
                ON i.tenant_id = m.tenant_id AND i.sku = m.sku
            LEFT JOIN sku_velocity v
                ON v.tenant_id = m.tenant_id AND v.sku = m.sku
            WHERE m.tenant_id = $1 AND m.channel = $2
            ORDER BY m.sku ASC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(channel)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_snapshot", e))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(catalog_row(row).map_err(|e| map_sqlx_error("decode_catalog_row", e))?);
        }

        Span::current().record("row_count", out.len());
        Ok(CatalogSnapshot::new(out))
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid()), err)]
    async fn seasonal_events(&self, tenant_id: TenantId) -> Result<Vec<SeasonalEvent>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                name,
                start_month,
                start_day,
                end_month,
                end_day,
                base_multiplier,
                learned_multiplier,
                active
            FROM seasonal_events
            WHERE tenant_id = $1
            ORDER BY start_month ASC, start_day ASC, name ASC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("seasonal_events", e))?;

        rows.iter()
            .map(|row| seasonal_event(row).map_err(|e| map_sqlx_error("decode_seasonal_event", e)))
            .collect()
    }
}

fn non_negative(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

fn catalog_row(row: &PgRow) -> Result<CatalogRow, sqlx::Error> {
    let sku: String = row.try_get("sku")?;

    let mapping = SkuChannelMapping {
        sku: sku.clone(),
        channel: row.try_get("channel")?,
        product_id: row.try_get::<Option<Uuid>, _>("product_id")?.map(ProductId::from_uuid),
        channel_velocity: row.try_get("channel_velocity")?,
        active: row.try_get("active")?,
    };

    let product = match row.try_get::<Option<Uuid>, _>("p_product_id")? {
        Some(id) => Some(ProductRecord {
            product_id: ProductId::from_uuid(id),
            sku: row.try_get("p_sku")?,
            title: row.try_get::<Option<String>, _>("p_title")?.unwrap_or_default(),
            is_parent: row.try_get::<Option<bool>, _>("p_is_parent")?.unwrap_or(false),
            parent_sku: row.try_get("p_parent_sku")?,
            variation_count: non_negative(row.try_get::<Option<i32>, _>("p_variation_count")?.unwrap_or(0)),
            lead_time_days: non_negative(row.try_get::<Option<i32>, _>("p_lead_time_days")?.unwrap_or(0)),
        }),
        None => None,
    };

    let inventory = match row.try_get::<Option<i64>, _>("available")? {
        Some(available) => Some(InventoryRecord {
            sku: sku.clone(),
            available,
            inbound_working: row.try_get::<Option<i64>, _>("inbound_working")?.unwrap_or(0),
            inbound_shipped: row.try_get::<Option<i64>, _>("inbound_shipped")?.unwrap_or(0),
            inbound_receiving: row.try_get::<Option<i64>, _>("inbound_receiving")?.unwrap_or(0),
        }),
        None => None,
    };

    let velocity = match row.try_get::<Option<f64>, _>("velocity_30d")? {
        Some(velocity_30d) => Some(VelocityRecord {
            sku: sku.clone(),
            velocity_30d,
            units_sold_30d: row.try_get::<Option<i64>, _>("units_sold_30d")?.unwrap_or(0),
        }),
        None => None,
    };

    Ok(CatalogRow {
        mapping,
        product,
        inventory,
        velocity,
    })
}

fn seasonal_event(row: &PgRow) -> Result<SeasonalEvent, sqlx::Error> {
    Ok(SeasonalEvent {
        name: row.try_get("name")?,
        start_month: non_negative(row.try_get("start_month")?),
        start_day: non_negative(row.try_get("start_day")?),
        end_month: non_negative(row.try_get("end_month")?),
        end_day: non_negative(row.try_get("end_day")?),
        base_multiplier: row.try_get("base_multiplier")?,
        learned_multiplier: row.try_get("learned_multiplier")?,
        active: row.try_get("active")?,
    })
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // undefined_table: feature not provisioned for this deployment
                Some("42P01") => StoreError::Unavailable(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Database(format!("connection pool closed in {}", operation)),
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
