use std::collections::{HashMap, HashSet};

use crate::models::ConnId;

/// Room membership, keyed both ways.
///
/// A room exists exactly while it has members: `join` creates it and the
/// last departure in `leave_all` prunes it. Members are kept in join order.
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: HashMap<String, Vec<ConnId>>,
    memberships: HashMap<ConnId, HashSet<String>>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room. Returns false if it was already a member.
    pub fn join(&mut self, room_id: &str, conn_id: &ConnId) -> bool {
        let members = self.rooms.entry(room_id.to_string()).or_default();
        if members.contains(conn_id) {
            return false;
        }
        members.push(conn_id.clone());
        self.memberships
            .entry(conn_id.clone())
            .or_default()
            .insert(room_id.to_string());
        true
    }

    /// Current members of a room; empty when the room is unknown.
    pub fn members(&self, room_id: &str) -> &[ConnId] {
        self.rooms.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a connection from every room it joined, returning those rooms.
    pub fn leave_all(&mut self, conn_id: &ConnId) -> Vec<String> {
        let Some(rooms) = self.memberships.remove(conn_id) else {
            return Vec::new();
        };

        let mut left: Vec<String> = rooms.into_iter().collect();
        left.sort();
        for room_id in &left {
            if let Some(members) = self.rooms.get_mut(room_id) {
                members.retain(|member| member != conn_id);
                if members.is_empty() {
                    self.rooms.remove(room_id);
                }
            }
        }
        left
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_creates_room() {
        let mut index = RoomIndex::new();
        let a = ConnId::from("a");
        assert!(index.join("alpha", &a));
        assert_eq!(index.members("alpha"), &[a.clone()]);
        assert_eq!(index.room_count(), 1);
    }

    #[test]
    fn test_rejoin_keeps_members_unique() {
        let mut index = RoomIndex::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        index.join("alpha", &a);
        index.join("alpha", &b);
        assert!(!index.join("alpha", &a));
        assert_eq!(index.members("alpha"), &[a, b]);
    }

    #[test]
    fn test_unknown_room_is_empty() {
        let index = RoomIndex::new();
        assert!(index.members("nowhere").is_empty());
    }

    #[test]
    fn test_leave_all_returns_every_room() {
        let mut index = RoomIndex::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        index.join("alpha", &a);
        index.join("beta", &a);
        index.join("alpha", &b);

        assert_eq!(index.leave_all(&a), vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(index.members("alpha"), &[b]);
        assert!(index.members("beta").is_empty());
        assert!(index.leave_all(&a).is_empty());
    }

    #[test]
    fn test_leave_all_prunes_empty_rooms() {
        let mut index = RoomIndex::new();
        let a = ConnId::from("a");
        index.join("alpha", &a);
        index.leave_all(&a);
        assert_eq!(index.room_count(), 0);
    }

    #[test]
    fn test_leave_all_is_idempotent() {
        let mut index = RoomIndex::new();
        let a = ConnId::from("a");
        index.join("alpha", &a);
        assert_eq!(index.leave_all(&a).len(), 1);
        assert!(index.leave_all(&a).is_empty());
        assert!(index.leave_all(&ConnId::from("ghost")).is_empty());
    }
}
