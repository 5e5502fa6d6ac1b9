use crate::{docs::ApiDoc, routes::create_api_routes, websocket::handler::websocket_handler, AppState};
use axum::{http::HeaderValue, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the complete HTTP application: API, WebSocket relay, docs and static client.
pub fn create_app(app_state: Arc<AppState>) -> Router {
    let config = &app_state.config;

    let mut router = Router::<Arc<AppState>>::new()
        // Mount API routes
        .nest("/api", create_api_routes())
        // Relay endpoint
        .route("/ws", get(websocket_handler));

    if !config.is_production() {
        router = router
            .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    // Serve the built web client, falling back to index.html for client-side routes
    if let Some(dir) = &config.static_dir {
        if Path::new(dir).is_dir() {
            info!("Serving static client from {}", dir);
            let index = Path::new(dir).join("index.html");
            router = router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
        } else {
            warn!("Static directory {} does not exist, not serving a client", dir);
        }
    }

    router
        .layer(cors_layer(config.cors_origin_list()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origins: Option<Vec<String>>) -> CorsLayer {
    let allow_origin = match origins {
        Some(origins) => AllowOrigin::list(
            origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()),
        ),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
