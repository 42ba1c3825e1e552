use axum::{middleware, routing::post, Router};

use crate::{
    handlers::wallet::{sign_request, sign_verify, upsert_wallet},
    http_server::AppState,
    middlewares::api_key::api_key_auth,
};

pub fn wallet_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/wallet/sign/request", post(sign_request))
        .route("/wallet/sign/verify", post(sign_verify))
        .route("/wallet/user/:user_key", post(upsert_wallet))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth))
}
