use std::sync::Arc;
use crate::application::services::DetectionService;

/// Shared state for the axum handlers: the use cases, not the adapters.
#[derive(Clone)]
pub struct HttpState {
    pub detection: Arc<DetectionService>,
}
