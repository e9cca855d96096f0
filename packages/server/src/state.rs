use std::sync::Arc;

use common::storage::ImageStore;

use crate::config::AppConfig;
use crate::repository::ItemRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ItemRepository>,
    pub images: Arc<dyn ImageStore>,
    pub config: AppConfig,
}
