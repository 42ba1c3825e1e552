use axum::{middleware, routing::get, Router};

use crate::{
    handlers::user::{get_user, get_user_twitter, get_user_wallets},
    http_server::AppState,
    middlewares::api_key::api_key_auth,
};

pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/:user_key", get(get_user))
        .route("/user/:user_key/wallets", get(get_user_wallets))
        .route("/user/:user_key/twitter", get(get_user_twitter))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth))
}
