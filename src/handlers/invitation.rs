use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    handlers::{ApiError, SuccessResponse},
    http_server::AppState,
    models::application::Application,
    models::user_invitation::UserInvitation,
};

const GET_CODE_ERROR_CODE: u32 = 4000;
const CREATE_ERROR_CODE: u32 = 4001;

#[derive(Debug, Default, Deserialize)]
pub struct CreateInvitationPayload {
    pub referral_code: Option<String>,
}

pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
    Json(payload): Json<CreateInvitationPayload>,
) -> Result<Json<SuccessResponse<UserInvitation>>, ApiError> {
    let invitation = state
        .invitations
        .create_user_invitation(&application, &user_key, payload.referral_code.as_deref())
        .await
        .map_err(|e| ApiError::new(CREATE_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(invitation))
}

pub async fn get_invitation_code(
    State(state): State<AppState>,
    Extension(application): Extension<Application>,
    Path(user_key): Path<String>,
) -> Result<Json<SuccessResponse<UserInvitation>>, ApiError> {
    let invitation = state
        .invitations
        .get_user_invitation_code(&application, &user_key)
        .await
        .map_err(|e| ApiError::new(GET_CODE_ERROR_CODE, e))?;

    Ok(SuccessResponse::new(invitation))
}
