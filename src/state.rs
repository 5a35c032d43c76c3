use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<Store>,
}
