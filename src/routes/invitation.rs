use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers::invitation::{create_invitation, get_invitation_code},
    http_server::AppState,
    middlewares::api_key::api_key_auth,
};

pub fn invitation_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/invitation/create/:user_key", post(create_invitation))
        .route("/invitation/user/:user_key/code", get(get_invitation_code))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth))
}
