use std::sync::Arc;

use civic_workflow::IssueWorkflow;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and engine are handles, the config is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: civic_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Issue workflow engine.
    pub workflow: IssueWorkflow,
}

impl AppState {
    /// Build the state, deriving the engine settings from `config`.
    pub fn new(pool: civic_db::DbPool, config: ServerConfig) -> Self {
        let workflow = IssueWorkflow::new(pool.clone(), config.workflow_config());
        Self {
            pool,
            config: Arc::new(config),
            workflow,
        }
    }
}
