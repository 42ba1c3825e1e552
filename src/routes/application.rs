use axum::{middleware, routing::post, Router};

use crate::{
    handlers::application::destroy_all_data, http_server::AppState,
    middlewares::api_key::api_key_auth,
};

pub fn application_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/app/destroy", post(destroy_all_data))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth))
}
