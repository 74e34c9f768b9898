use std::sync::Arc;

use crate::config::Config;
use crate::layout::templates::TemplateCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built-in template rules; read-only after startup.
    pub templates: Arc<TemplateCatalog>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            templates: Arc::new(TemplateCatalog::builtin()),
        }
    }
}
