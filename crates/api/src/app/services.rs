use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use sellerdesk_infra::{
    catalog::{CatalogReader, InMemoryCatalogStore, PostgresCatalogStore},
    config::AppConfig,
    jobs::ForecastJobStore,
    replenishment::ForecastRunner,
};

/// Shared, request-independent state behind every route.
pub struct AppServices {
    pub forecasts: ForecastRunner<Arc<dyn CatalogReader>>,
    pub jobs: ForecastJobStore,
}

impl AppServices {
    pub fn new(reader: Arc<dyn CatalogReader>) -> Self {
        Self {
            forecasts: ForecastRunner::new(reader),
            jobs: ForecastJobStore::new(),
        }
    }

    /// Services over an in-process catalog (dev and tests).
    pub fn in_memory(store: Arc<InMemoryCatalogStore>) -> Self {
        Self::new(store)
    }
}

/// Wire services according to `USE_PERSISTENT_STORES`.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, sqlx::Error> {
    match (config.use_persistent_stores, config.database_url.as_deref()) {
        (true, Some(database_url)) => {
            let pool = PgPool::connect(database_url).await?;
            info!("using postgres catalog store");
            Ok(AppServices::new(Arc::new(PostgresCatalogStore::new(pool))))
        }
        _ => {
            info!("using in-memory catalog store");
            Ok(AppServices::in_memory(Arc::new(InMemoryCatalogStore::new())))
        }
    }
}
