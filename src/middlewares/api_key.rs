use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
    Json,
};

use crate::{handlers::ErrorResponse, http_server::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

const AUTH_ERROR_CODE: u32 = 401;

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            message: message.to_string(),
            code: AUTH_ERROR_CODE,
        }),
    )
}

/// Resolves the calling tenant from the `x-api-key` header and injects it as
/// a request extension. Unknown and disabled tenants are turned away before
/// any handler runs.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let apikey = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("API key needed"))?
        .to_string();

    let application = state
        .db
        .applications
        .find_by_apikey(&apikey)
        .await
        .map_err(|e| unauthorized(&format!("Error fetching application: {e}")))?
        .ok_or_else(|| unauthorized("Application not exist"))?;

    if application.disabled {
        return Err(unauthorized("Application disabled"));
    }

    req.extensions_mut().insert(application);
    Ok(next.run(req).await)
}
