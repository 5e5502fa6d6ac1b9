use std::collections::HashMap;

use crate::models::ConnId;

/// Display name bound to each connection that has joined.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    names: HashMap<ConnId, String>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the name for a connection, replacing any previous one.
    pub fn bind(&mut self, conn_id: ConnId, display_name: String) {
        self.names.insert(conn_id, display_name);
    }

    pub fn lookup(&self, conn_id: &ConnId) -> Option<&str> {
        self.names.get(conn_id).map(String::as_str)
    }

    /// Remove the binding. Absent connections are ignored.
    pub fn unbind(&mut self, conn_id: &ConnId) -> Option<String> {
        self.names.remove(conn_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
