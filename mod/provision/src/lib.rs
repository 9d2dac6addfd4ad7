pub mod api;
pub mod model;
pub mod service;
pub mod template;

use std::sync::Arc;

use axum::Router;
use commission_core::Module;

use service::ProvisionService;

/// Provisioning module — serves per-device configuration files.
pub struct ProvisionModule {
    service: Arc<ProvisionService>,
}

impl ProvisionModule {
    pub fn new(service: ProvisionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for ProvisionModule {
    fn name(&self) -> &str {
        "provision"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
