use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    handlers::{ApiError, SuccessResponse},
    http_server::AppState,
    models::application::Application,
    models::user_wallet::{UserWallet, UserWalletInput},
    services::wallet_service::{
        WalletSignRequestData, WalletSignRequestPayload, WalletSignVerifyPayload,
        WalletSignVerifyResult,
    },
};

const WALLET_ERROR_CODE: u32 = 1000;

pub async fn sign_request(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Json(payload): Json<WalletSignRequestPayload>,
) -> Result<Json<SuccessResponse<WalletSignRequestData>>, ApiError> {
    let data = state
        .wallet
        .request_sign(application.id, payload)
        .await
        .map_err(|e| ApiError::new(WALLET_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(data))
}

pub async fn sign_verify(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Json(payload): Json<WalletSignVerifyPayload>,
) -> Result<Json<SuccessResponse<WalletSignVerifyResult>>, ApiError> {
    let result = state
        .wallet
        .verify_sign(application.id, payload)
        .await
        .map_err(|e| ApiError::new(WALLET_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(result))
}

pub async fn upsert_wallet(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
    Json(input): Json<UserWalletInput>,
) -> Result<Json<SuccessResponse<UserWallet>>, ApiError> {
    let wallet = state
        .wallet
        .upsert_wallet(application.id, &user_key, input)
        .await
        .map_err(|e| ApiError::new(WALLET_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(wallet))
}
