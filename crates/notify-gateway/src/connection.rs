//! Live connection handles and the process-wide connection pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::messages::ServerMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to one live client connection.
///
/// Messages go out through a bounded channel with `try_send`: a slow or dead
/// client loses messages instead of stalling the sender.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// The authenticated user, or `None` for an anonymous connection.
    pub user_id: Option<Uuid>,
    /// Sender for outbound messages.
    sender: mpsc::Sender<ServerMessage>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still live.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new handle with its outbound receiver.
    pub fn new(
        user_id: Option<Uuid>,
        buffer_size: usize,
    ) -> (Arc<Self>, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let handle = Arc::new(Self {
            id: Uuid::new_v4(),
            user_id,
            sender: tx,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        });
        (handle, rx)
    }

    /// Push a message to this connection. Returns whether it was queued.
    pub fn send(&self, message: ServerMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Whether the connection is still live.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection dead; subsequent sends become no-ops.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// All live connections in this process.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.connections.insert(handle.id, handle);
    }

    /// Remove a connection, returning its handle if it was present.
    pub fn remove(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.remove(id).map(|(_, handle)| handle)
    }

    /// Look up a connection.
    pub fn get(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    /// All connections belonging to a user, oldest first.
    pub fn user_connections(&self, user_id: Uuid) -> Vec<Arc<ConnectionHandle>> {
        let mut conns: Vec<Arc<ConnectionHandle>> = self
            .connections
            .iter()
            .filter(|entry| entry.user_id == Some(user_id))
            .map(|entry| entry.value().clone())
            .collect();
        conns.sort_by_key(|c| c.connected_at);
        conns
    }

    /// Every live connection in the pool.
    pub fn all(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Total connection count.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_queues_until_the_buffer_fills() {
        let (handle, mut rx) = ConnectionHandle::new(None, 2);

        assert!(handle.send(ServerMessage::Joined { status: "success".into() }));
        assert!(handle.send(ServerMessage::UnreadCount { count: 1 }));
        // Third message is dropped, not blocked on.
        assert!(!handle.send(ServerMessage::UnreadCount { count: 2 }));

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn closed_receiver_marks_the_connection_dead() {
        let (handle, rx) = ConnectionHandle::new(None, 2);
        drop(rx);

        assert!(!handle.send(ServerMessage::UnreadCount { count: 0 }));
        assert!(!handle.is_alive());
    }

    #[test]
    fn user_connections_are_oldest_first() {
        let pool = ConnectionPool::new();
        let user = Uuid::new_v4();
        let (first, _rx1) = ConnectionHandle::new(Some(user), 4);
        let (second, _rx2) = ConnectionHandle::new(Some(user), 4);
        let (other, _rx3) = ConnectionHandle::new(Some(Uuid::new_v4()), 4);
        pool.add(second.clone());
        pool.add(first.clone());
        pool.add(other);

        let conns = pool.user_connections(user);
        assert_eq!(conns.len(), 2);
        assert!(conns[0].connected_at <= conns[1].connected_at);
    }
}
