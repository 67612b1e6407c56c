//! Server state management

use cognito_core::CopilotService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CopilotService>,
}

impl AppState {
    pub fn new(service: CopilotService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
