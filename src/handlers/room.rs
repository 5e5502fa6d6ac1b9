use crate::{models::RoomResponse, AppState};
use axum::{extract::{Path, State}, Json};
use std::sync::Arc;
use tracing::debug;

/// Members of a room. Unknown rooms are reported as empty.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    params(
        ("room_id" = String, Path, description = "Room identifier")
    ),
    responses(
        (status = 200, description = "Room roster", body = RoomResponse)
    )
)]
pub async fn room_members(
    State(app_state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Json<RoomResponse> {
    debug!("Roster requested for room {}", room_id);
    let members = app_state.relay.snapshot(&room_id);
    Json(RoomResponse { room_id, members })
}
