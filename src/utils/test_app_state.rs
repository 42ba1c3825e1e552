use std::sync::Arc;

use crate::{config::Config, http_server::AppState, utils::test_db::test_db_persistence};

pub async fn create_test_app_state() -> AppState {
    let config = Config::load_test_env().expect("Failed to load test configuration");
    let db = test_db_persistence().await;
    AppState::new(Arc::new(db), Arc::new(config))
}
