use std::sync::Arc;

use jotter_service::JotterService;
use jotter_storage::{MemoryStore, Repository};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<JotterService>,
}
impl AppState {
	pub fn new(config: &jotter_config::Config) -> Self {
		Self::from_repository(Arc::new(MemoryStore::new(config.storage.seed_sample_data)))
	}

	pub fn from_repository(repo: Arc<dyn Repository>) -> Self {
		Self { service: Arc::new(JotterService::new(repo)) }
	}
}
