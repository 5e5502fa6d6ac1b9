use crate::{
    clients::execution_client::{self, ExecutionError},
    models::{ErrorResponse, ExecuteRequest, ExecuteResponse, LanguagesResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, info};

/// Languages available for execution
#[utoipa::path(
    get,
    path = "/api/v1/languages",
    responses(
        (status = 200, description = "Supported languages and default versions", body = LanguagesResponse)
    )
)]
pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: execution_client::supported_languages(),
    })
}

/// Run source code on the execution service
#[utoipa::path(
    post,
    path = "/api/v1/execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Execution finished", body = ExecuteResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Execution service failed", body = ErrorResponse)
    )
)]
pub async fn execute_code(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<(StatusCode, Json<ExecuteResponse>), (StatusCode, Json<ErrorResponse>)> {

    if payload.source_code.trim().is_empty() {
        return Err(ErrorResponse::reply(StatusCode::BAD_REQUEST, "Source code is empty"));
    }

    info!("Execution requested for language {}", payload.language_name);
    match app_state.executor.execute(&payload).await {
        Ok(result) => Ok((StatusCode::OK, Json(result))),
        Err(e @ ExecutionError::UnsupportedLanguage(_)) => {
            Err(ErrorResponse::reply(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!("Execution failed: {}", e);
            Err(ErrorResponse::reply(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
