pub mod batch_returns;
pub mod common;
pub mod materials;
pub mod reports;

use crate::db::DbPool;
use crate::services::{
    batch_returns::BatchReturnService, dispatches::DispatchService, reports::ReportService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub dispatches: Arc<DispatchService>,
    pub batch_returns: Arc<BatchReturnService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    /// Builds every service over the shared connection pool
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            dispatches: Arc::new(DispatchService::new(db_pool.clone())),
            batch_returns: Arc::new(BatchReturnService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool)),
        }
    }
}
