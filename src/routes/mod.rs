pub mod api;
pub mod app;

pub use api::create_api_routes;
pub use app::create_app;
