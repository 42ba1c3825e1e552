use axum::{extract::State, Extension, Json};

use crate::{
    handlers::{ApiError, SuccessResponse},
    http_server::AppState,
    models::application::Application,
};

const DESTROY_ERROR_CODE: u32 = 3000;

/// Wipes every wallet, social binding and invitation the calling tenant
/// owns. The tenant row itself stays.
pub async fn destroy_all_data(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
) -> Result<Json<SuccessResponse<bool>>, ApiError> {
    tracing::warn!(application_id = application.id, "wiping all tenant data");

    state
        .wallet
        .destroy_all_wallets(application.id)
        .await
        .map_err(|e| ApiError::new(DESTROY_ERROR_CODE, e))?;
    state
        .twitter
        .destroy_all_twitter(application.id)
        .await
        .map_err(|e| ApiError::new(DESTROY_ERROR_CODE, e))?;
    state
        .invitations
        .destroy_all_invitations(application.id)
        .await
        .map_err(|e| ApiError::new(DESTROY_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(true))
}
