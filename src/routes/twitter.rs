use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers::twitter::{
        bind_callback, check_tweet_like, check_tweet_retweet, check_user_like, check_user_retweet,
        get_auth_url,
    },
    http_server::AppState,
    middlewares::api_key::api_key_auth,
};

pub fn twitter_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/twitter/user/:user_key/authurl", get(get_auth_url))
        .route("/twitter/bind/callback", post(bind_callback))
        .route(
            "/twitter/check_tweet_like/:user_key/:tweet_id",
            get(check_tweet_like),
        )
        .route(
            "/twitter/check_tweet_retweet/:user_key/:tweet_id",
            get(check_tweet_retweet),
        )
        .route(
            "/twitter/check_user_like/:user_key/:tweet_id",
            get(check_user_like),
        )
        .route(
            "/twitter/check_user_retweet/:user_key/:tweet_id",
            get(check_user_retweet),
        )
        .route_layer(middleware::from_fn_with_state(state, api_key_auth))
}
