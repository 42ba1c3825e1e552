use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    handlers::{ApiError, SuccessResponse},
    http_server::AppState,
    models::application::Application,
    models::user_twitter::TwitterUserInfo,
    models::user_wallet::UserWallet,
};

const USER_ERROR_CODE: u32 = 3000;
const WALLETS_ERROR_CODE: u32 = 3001;
const TWITTER_ERROR_CODE: u32 = 3002;

/// Everything the service knows about one user of a tenant.
#[derive(Debug, Serialize)]
pub struct UserAllData {
    pub user_key: String,
    pub wallets: Vec<UserWallet>,
    pub twitter: Option<TwitterUserInfo>,
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
) -> Result<Json<SuccessResponse<UserAllData>>, ApiError> {
    let wallets = state
        .wallet
        .get_user_wallets(application.id, &user_key)
        .await
        .map_err(|e| ApiError::new(USER_ERROR_CODE, e))?;
    let twitter = state
        .twitter
        .get_user_twitter_info(application.id, &user_key)
        .await
        .map_err(|e| ApiError::new(USER_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(UserAllData {
        user_key,
        wallets,
        twitter,
    }))
}

pub async fn get_user_wallets(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
) -> Result<Json<SuccessResponse<Vec<UserWallet>>>, ApiError> {
    let wallets = state
        .wallet
        .get_user_wallets(application.id, &user_key)
        .await
        .map_err(|e| ApiError::new(WALLETS_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(wallets))
}

pub async fn get_user_twitter(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
) -> Result<Json<SuccessResponse<Option<TwitterUserInfo>>>, ApiError> {
    let twitter = state
        .twitter
        .get_user_twitter_info(application.id, &user_key)
        .await
        .map_err(|e| ApiError::new(TWITTER_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(twitter))
}
