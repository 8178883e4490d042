//! Per-user rooms: the unit of push targeting.

use std::collections::HashSet;

use dashmap::DashMap;
use uuid::Uuid;

use crate::connection::ConnectionId;

/// Room membership: which connections belong to which user.
///
/// The in-memory implementation covers a single gateway process. A
/// multi-process deployment would implement this over the shared key-value
/// layer plus a pub/sub relay so every instance holding a connection for a
/// user sees the fan-out; that swap happens here, behind this trait.
pub trait RoomRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Add a connection to a user's room. Idempotent.
    fn join(&self, user_id: Uuid, connection_id: ConnectionId);

    /// Remove a connection from a user's room.
    fn leave(&self, user_id: Uuid, connection_id: ConnectionId);

    /// Connection ids currently in a user's room.
    fn members_of(&self, user_id: Uuid) -> Vec<ConnectionId>;
}

/// Single-process room registry.
#[derive(Debug, Default)]
pub struct InMemoryRooms {
    rooms: DashMap<Uuid, HashSet<ConnectionId>>,
}

impl InMemoryRooms {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomRegistry for InMemoryRooms {
    fn join(&self, user_id: Uuid, connection_id: ConnectionId) {
        self.rooms.entry(user_id).or_default().insert(connection_id);
    }

    fn leave(&self, user_id: Uuid, connection_id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(&user_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove(&user_id);
            }
        }
    }

    fn members_of(&self, user_id: Uuid) -> Vec<ConnectionId> {
        self.rooms
            .get(&user_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }
}
