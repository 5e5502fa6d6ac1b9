use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{ClientInfo, ConnId, ReceivedMessage, SendMessage};
use super::hub::SessionHub;
use super::router::{Outbound, RelayState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub connections: usize,
    pub participants: usize,
    pub rooms: usize,
}

/// Shared entry point used by every connection task.
///
/// Outbound messages are queued while the state lock is held, so concurrent
/// joins to one room reach every member in the order they were applied.
/// Queuing never waits on a recipient.
#[derive(Debug)]
pub struct Relay {
    state: Mutex<RelayState>,
    hub: SessionHub,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RelayState::new()),
            hub: SessionHub::new(),
        }
    }

    pub fn connect(&self, conn_id: ConnId, tx: mpsc::Sender<SendMessage>) {
        info!("Connection {} opened", conn_id);
        self.hub.register(conn_id, tx);
    }

    pub fn dispatch(&self, sender: &ConnId, event: ReceivedMessage) {
        let mut state = self.state.lock();
        if !self.hub.contains(sender) {
            debug!("Ignoring event from closed connection {}", sender);
            return;
        }
        let outbound = state.apply(sender, event);
        self.deliver_all(outbound);
    }

    /// Run departure cleanup for a connection. Only the first call for a
    /// given connection has any effect.
    pub fn disconnect(&self, conn_id: &ConnId) {
        if !self.hub.remove(conn_id) {
            debug!("Connection {} already disconnected", conn_id);
            return;
        }

        let mut state = self.state.lock();
        let outbound = state.disconnect(conn_id);
        self.deliver_all(outbound);
        info!("Connection {} closed", conn_id);
    }

    /// Roster of a room; empty when nobody is in it.
    pub fn snapshot(&self, room_id: &str) -> Vec<ClientInfo> {
        self.state.lock().snapshot(room_id)
    }

    #[cfg(test)]
    pub fn members(&self, room_id: &str) -> Vec<ConnId> {
        self.state.lock().rooms().members(room_id).to_vec()
    }

    pub fn stats(&self) -> RelayStats {
        let state = self.state.lock();
        RelayStats {
            connections: self.hub.len(),
            participants: state.registry().len(),
            rooms: state.rooms().room_count(),
        }
    }

    fn deliver_all(&self, outbound: Vec<Outbound>) {
        for Outbound { to, message } in outbound {
            self.hub.deliver(&to, message);
        }
    }
}
