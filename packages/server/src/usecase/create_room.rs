//! UseCase: meeting room creation (`POST /api/rooms`).
//!
//! Consumed once at meeting creation time; the relay itself only cares
//! about rooms through joins, which create rooms implicitly.

use std::sync::Arc;

use hiroba_shared::time::now_millis;

use crate::domain::{RoomId, RoomRepository, Timestamp};

pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// Create an empty room and return its generated id. Always succeeds.
    pub async fn execute(&self) -> RoomId {
        self.rooms.create_room(Timestamp::new(now_millis())).await
    }
}
