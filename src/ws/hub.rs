use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::models::{ConnId, SendMessage};

/// Outbound queues of all live sessions.
#[derive(Debug, Default)]
pub struct SessionHub {
    sessions: RwLock<HashMap<ConnId, mpsc::Sender<SendMessage>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn_id: ConnId, tx: mpsc::Sender<SendMessage>) {
        self.sessions.write().insert(conn_id, tx);
    }

    /// Drop the queue of a session. Returns false when it was already gone.
    pub fn remove(&self, conn_id: &ConnId) -> bool {
        self.sessions.write().remove(conn_id).is_some()
    }

    pub fn contains(&self, conn_id: &ConnId) -> bool {
        self.sessions.read().contains_key(conn_id)
    }

    /// Queue a message without waiting. A full or closed queue loses this
    /// message only; other recipients are unaffected.
    pub fn deliver(&self, to: &ConnId, message: SendMessage) -> bool {
        let sessions = self.sessions.read();
        let Some(tx) = sessions.get(to) else {
            debug!("Dropping message for unknown connection {}", to);
            return false;
        };

        match tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full for connection {}, dropping message", to);
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Outbound queue closed for connection {}", to);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentMessage;

    fn change(content: &str) -> SendMessage {
        SendMessage::CodeChange(ContentMessage { content: content.to_string() })
    }

    #[tokio::test]
    async fn test_deliver_to_registered_session() {
        let hub = SessionHub::new();
        let (tx, mut rx) = mpsc::channel(4);
        let a = ConnId::from("a");
        hub.register(a.clone(), tx);

        assert!(hub.deliver(&a, change("x")));
        assert_eq!(rx.recv().await, Some(change("x")));
    }

    #[test]
    fn test_deliver_to_unknown_session_is_dropped() {
        let hub = SessionHub::new();
        assert!(!hub.deliver(&ConnId::from("ghost"), change("x")));
    }

    #[tokio::test]
    async fn test_full_queue_does_not_block_others() {
        let hub = SessionHub::new();
        let (slow_tx, _slow_rx) = mpsc::channel(1);
        let (fast_tx, mut fast_rx) = mpsc::channel(4);
        let slow = ConnId::from("slow");
        let fast = ConnId::from("fast");
        hub.register(slow.clone(), slow_tx);
        hub.register(fast.clone(), fast_tx);

        assert!(hub.deliver(&slow, change("1")));
        assert!(!hub.deliver(&slow, change("2")));
        assert!(hub.deliver(&fast, change("2")));
        assert_eq!(fast_rx.recv().await, Some(change("2")));
    }

    #[test]
    fn test_remove_reports_first_removal_only() {
        let hub = SessionHub::new();
        let (tx, _rx) = mpsc::channel(1);
        let a = ConnId::from("a");
        hub.register(a.clone(), tx);
        assert!(hub.remove(&a));
        assert!(!hub.remove(&a));
        assert_eq!(hub.len(), 0);
    }
}
