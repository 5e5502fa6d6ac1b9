pub mod registry;
pub mod rooms;
pub mod router;
pub mod hub;
pub mod relay;

pub use relay::Relay;
