use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::AgentRuntime;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Executes agent stages. Default: `LlmClient`; tests swap in a stub.
    pub runtime: Arc<dyn AgentRuntime>,
}
