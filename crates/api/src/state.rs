use std::sync::Arc;

use flowgate_engine::WorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: the engine is an `Arc` handle and the config is
/// wrapped in one.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory workflow engine backing every resource.
    pub engine: WorkflowEngine,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
