use axum::Router;

use crate::{
    http_server::AppState,
    routes::{
        application::application_routes, invitation::invitation_routes, twitter::twitter_routes,
        user::user_routes, wallet::wallet_routes,
    },
};

pub mod application;
pub mod invitation;
pub mod twitter;
pub mod user;
pub mod wallet;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(wallet_routes(state.clone()))
        .merge(twitter_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(invitation_routes(state.clone()))
        .merge(application_routes(state))
}
