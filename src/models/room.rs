use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::messages::ClientInfo;

/// Current roster of a room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: String,
    pub members: Vec<ClientInfo>,
}
