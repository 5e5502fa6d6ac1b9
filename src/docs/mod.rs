use utoipa::OpenApi;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::ready_check,
        crate::handlers::diagnostics::diagnostics,
        crate::handlers::room::room_members,
        crate::handlers::execute::list_languages,
        crate::handlers::execute::execute_code,
    ),
    components(
        schemas(
            HealthResponse,
            DiagnosticsResponse,
            ErrorResponse,
            ConnId,
            ClientInfo,
            RoomResponse,
            ExecuteRequest,
            ExecuteResponse,
            LanguageInfo,
            LanguagesResponse,
        )
    ),
    tags(
        (name = "api", description = "Relay API endpoints")
    )
)]
pub struct ApiDoc;
