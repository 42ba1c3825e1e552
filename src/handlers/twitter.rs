use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    handlers::{ApiError, SuccessResponse},
    http_server::AppState,
    models::application::Application,
    models::user_twitter::TwitterUserInfo,
    services::twitter_service::EngagementCheck,
};

const BIND_ERROR_CODE: u32 = 2001;
const AUTH_URL_ERROR_CODE: u32 = 2002;
const TWEET_LIKE_ERROR_CODE: u32 = 2003;
const TWEET_RETWEET_ERROR_CODE: u32 = 2004;
const USER_LIKE_ERROR_CODE: u32 = 2005;
const USER_RETWEET_ERROR_CODE: u32 = 2006;

#[derive(Debug, Deserialize)]
pub struct AuthUrlQuery {
    pub callback: String,
}

#[derive(Debug, Deserialize)]
pub struct BindCallbackPayload {
    pub state: String,
    pub code: String,
}

pub async fn get_auth_url(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
    Query(query): Query<AuthUrlQuery>,
) -> Result<Json<SuccessResponse<String>>, ApiError> {
    let auth_url = state
        .twitter
        .get_user_auth_url(&application, &user_key, &query.callback)
        .map_err(|e| ApiError::new(AUTH_URL_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(auth_url))
}

pub async fn bind_callback(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Json(payload): Json<BindCallbackPayload>,
) -> Result<Json<SuccessResponse<TwitterUserInfo>>, ApiError> {
    let binding = state
        .twitter
        .bind_callback(&application, &payload.state, &payload.code)
        .await
        .map_err(|e| ApiError::new(BIND_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(binding.user_info()))
}

/// The engagement checks all answer with the cache row id on success and -1
/// on a verified miss.
async fn check(
    state: AppState,
    application: Application,
    user_key: String,
    tweet_id: String,
    variant: EngagementCheck,
    error_code: u32,
) -> Result<Json<SuccessResponse<i64>>, ApiError> {
    let verdict = state
        .twitter
        .check_engagement(&application, &user_key, &tweet_id, variant)
        .await
        .map_err(|e| ApiError::new(error_code, e))?;

    Ok(SuccessResponse::new(verdict))
}

pub async fn check_tweet_like(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path((user_key, tweet_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<i64>>, ApiError> {
    check(
        state,
        application,
        user_key,
        tweet_id,
        EngagementCheck::UserInTweetLikers,
        TWEET_LIKE_ERROR_CODE,
    )
    .await
}

pub async fn check_tweet_retweet(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path((user_key, tweet_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<i64>>, ApiError> {
    check(
        state,
        application,
        user_key,
        tweet_id,
        EngagementCheck::UserInTweetRetweeters,
        TWEET_RETWEET_ERROR_CODE,
    )
    .await
}

pub async fn check_user_like(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path((user_key, tweet_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<i64>>, ApiError> {
    check(
        state,
        application,
        user_key,
        tweet_id,
        EngagementCheck::TweetInUserLikes,
        USER_LIKE_ERROR_CODE,
    )
    .await
}

pub async fn check_user_retweet(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path((user_key, tweet_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<i64>>, ApiError> {
    check(
        state,
        application,
        user_key,
        tweet_id,
        EngagementCheck::TweetInUserTimeline,
        USER_RETWEET_ERROR_CODE,
    )
    .await
}
