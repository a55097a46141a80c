use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::SynthesisResult;
use crate::core::service::SynthesisService;

/// Application state that can be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Synthesis workflow wired to the configured backend and store
    pub service: Arc<SynthesisService>,
}

impl AppState {
    /// Build the state from configuration, connecting the Azure clients
    pub fn new(config: ServerConfig) -> SynthesisResult<Arc<Self>> {
        let service = SynthesisService::from_config(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// State around an already built service, used by tests with fakes
    pub fn with_service(config: ServerConfig, service: SynthesisService) -> Arc<Self> {
        Arc::new(Self {
            config,
            service: Arc::new(service),
        })
    }
}
