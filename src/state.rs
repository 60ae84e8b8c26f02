//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::CepService;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub cep_service: Arc<CepService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(cep_service: Arc<CepService>, cache: Arc<dyn CacheService>) -> Self {
        Self { cep_service, cache }
    }
}
