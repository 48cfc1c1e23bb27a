use crate::facilitator::Facilitator;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub facilitator: Arc<Facilitator>,
}

impl AppState {
    pub fn new(facilitator: Arc<Facilitator>) -> Self {
        Self { facilitator }
    }
}
