use std::sync::Arc;

use crate::db::TripStore;
use crate::services::TextGenerator;

/// Handles shared by every request. Built once in `main` and injected via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TripStore>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn TripStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }
}
