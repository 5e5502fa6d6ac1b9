use tracing::debug;

use crate::models::{
    ClientInfo, CodeChangeMessage, ConnId, ContentMessage, DisconnectedMessage, JoinMessage,
    JoinedMessage, ReceivedMessage, SendMessage, SyncCodeMessage,
};
use super::registry::ConnectionRegistry;
use super::rooms::RoomIndex;

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: ConnId,
    pub message: SendMessage,
}

/// Relay state: who is connected under which name, and who is in which room.
///
/// Every transition is a plain function of the current state and one event
/// and returns the messages to deliver. Nothing here performs I/O.
#[derive(Debug, Default)]
pub struct RelayState {
    registry: ConnectionRegistry,
    rooms: RoomIndex,
}

impl RelayState {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomIndex::new(),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn rooms(&self) -> &RoomIndex {
        &self.rooms
    }

    /// Apply one inbound event from `sender`.
    pub fn apply(&mut self, sender: &ConnId, event: ReceivedMessage) -> Vec<Outbound> {
        match event {
            ReceivedMessage::Join(join) => self.join(sender, join),
            ReceivedMessage::CodeChange(change) => self.code_change(sender, change),
            ReceivedMessage::SyncCode(sync) => self.sync_code(sender, sync),
        }
    }

    fn join(&mut self, sender: &ConnId, join: JoinMessage) -> Vec<Outbound> {
        let JoinMessage { room_id, display_name } = join;
        debug!("{} joins room {} as {:?}", sender, room_id, display_name);

        self.registry.bind(sender.clone(), display_name.clone());
        self.rooms.join(&room_id, sender);

        let snapshot = self.snapshot(&room_id);
        let joined = SendMessage::Joined(JoinedMessage {
            snapshot: snapshot.clone(),
            display_name,
            conn_id: sender.clone(),
        });

        snapshot
            .into_iter()
            .map(|client| Outbound {
                to: client.conn_id,
                message: joined.clone(),
            })
            .collect()
    }

    fn code_change(&self, sender: &ConnId, change: CodeChangeMessage) -> Vec<Outbound> {
        let CodeChangeMessage { room_id, content } = change;
        let message = SendMessage::CodeChange(ContentMessage { content });

        self.rooms
            .members(&room_id)
            .iter()
            .filter(|member| *member != sender)
            .map(|member| Outbound {
                to: member.clone(),
                message: message.clone(),
            })
            .collect()
    }

    fn sync_code(&self, sender: &ConnId, sync: SyncCodeMessage) -> Vec<Outbound> {
        debug!("{} syncs content to {}", sender, sync.target_conn_id);
        vec![Outbound {
            to: sync.target_conn_id,
            message: SendMessage::CodeChange(ContentMessage { content: sync.content }),
        }]
    }

    /// Remove a connection from every room and tell the remaining members.
    pub fn disconnect(&mut self, conn_id: &ConnId) -> Vec<Outbound> {
        let display_name = self.registry.lookup(conn_id).unwrap_or_default().to_string();
        let left = self.rooms.leave_all(conn_id);

        let mut outbound = Vec::new();
        for room_id in &left {
            let message = SendMessage::Disconnected(DisconnectedMessage {
                conn_id: conn_id.clone(),
                display_name: display_name.clone(),
            });
            outbound.extend(self.rooms.members(room_id).iter().map(|member| Outbound {
                to: member.clone(),
                message: message.clone(),
            }));
        }

        self.registry.unbind(conn_id);
        outbound
    }

    /// Full roster of a room, resolved through the registry.
    pub fn snapshot(&self, room_id: &str) -> Vec<ClientInfo> {
        self.rooms
            .members(room_id)
            .iter()
            .map(|member| ClientInfo {
                conn_id: member.clone(),
                display_name: self.registry.lookup(member).unwrap_or_default().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(state: &mut RelayState, conn: &ConnId, room: &str, name: &str) -> Vec<Outbound> {
        state.apply(
            conn,
            ReceivedMessage::Join(JoinMessage {
                room_id: room.to_string(),
                display_name: name.to_string(),
            }),
        )
    }

    fn recipients(outbound: &[Outbound]) -> Vec<ConnId> {
        let mut to: Vec<ConnId> = outbound.iter().map(|o| o.to.clone()).collect();
        to.sort();
        to
    }

    #[test]
    fn test_first_join_notifies_only_joiner() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let out = join(&mut state, &a, "alpha", "Ann");

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, a);
        match &out[0].message {
            SendMessage::Joined(joined) => {
                assert_eq!(joined.conn_id, a);
                assert_eq!(joined.display_name, "Ann");
                assert_eq!(joined.snapshot.len(), 1);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_join_broadcasts_full_snapshot_to_everyone() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        join(&mut state, &a, "alpha", "Ann");
        let out = join(&mut state, &b, "alpha", "Bo");

        assert_eq!(recipients(&out), vec![a.clone(), b.clone()]);
        let expected = vec![
            ClientInfo { conn_id: a, display_name: "Ann".to_string() },
            ClientInfo { conn_id: b.clone(), display_name: "Bo".to_string() },
        ];
        for o in &out {
            match &o.message {
                SendMessage::Joined(joined) => {
                    assert_eq!(joined.snapshot, expected);
                    assert_eq!(joined.conn_id, b);
                    assert_eq!(joined.display_name, "Bo");
                }
                other => panic!("unexpected message {:?}", other),
            }
        }
    }

    #[test]
    fn test_snapshot_tracks_joins_and_departures() {
        let mut state = RelayState::new();
        let conns: Vec<ConnId> = (0..5).map(|i| ConnId::from(format!("c{}", i))).collect();
        for (i, conn) in conns.iter().enumerate() {
            join(&mut state, conn, "alpha", &format!("user{}", i));
        }
        state.disconnect(&conns[1]);
        state.disconnect(&conns[3]);
        join(&mut state, &conns[0], "alpha", "user0");

        let members: Vec<ConnId> = state.snapshot("alpha").into_iter().map(|c| c.conn_id).collect();
        assert_eq!(members, vec![conns[0].clone(), conns[2].clone(), conns[4].clone()]);
    }

    #[test]
    fn test_code_change_skips_sender() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        let c = ConnId::from("c");
        join(&mut state, &a, "alpha", "Ann");
        join(&mut state, &b, "alpha", "Bo");
        join(&mut state, &c, "alpha", "Cy");

        let out = state.apply(
            &a,
            ReceivedMessage::CodeChange(CodeChangeMessage {
                room_id: "alpha".to_string(),
                content: "print(1)".to_string(),
            }),
        );
        assert_eq!(recipients(&out), vec![b, c]);
        assert!(out.iter().all(|o| o.message
            == SendMessage::CodeChange(ContentMessage { content: "print(1)".to_string() })));
    }

    #[test]
    fn test_code_change_to_unknown_room_is_noop() {
        let mut state = RelayState::new();
        let out = state.apply(
            &ConnId::from("a"),
            ReceivedMessage::CodeChange(CodeChangeMessage {
                room_id: "nowhere".to_string(),
                content: "x".to_string(),
            }),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_sync_code_targets_single_connection() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        let c = ConnId::from("c");
        join(&mut state, &a, "alpha", "Ann");
        join(&mut state, &b, "alpha", "Bo");
        join(&mut state, &c, "alpha", "Cy");

        let out = state.apply(
            &a,
            ReceivedMessage::SyncCode(SyncCodeMessage {
                target_conn_id: c.clone(),
                content: "let x = 1;".to_string(),
            }),
        );
        assert_eq!(
            out,
            vec![Outbound {
                to: c,
                message: SendMessage::CodeChange(ContentMessage { content: "let x = 1;".to_string() }),
            }]
        );
    }

    #[test]
    fn test_disconnect_notifies_every_room() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        let c = ConnId::from("c");
        join(&mut state, &a, "r1", "Ann");
        join(&mut state, &a, "r2", "Ann");
        join(&mut state, &b, "r1", "Bo");
        join(&mut state, &c, "r2", "Cy");

        let out = state.disconnect(&a);
        assert_eq!(recipients(&out), vec![b.clone(), c.clone()]);
        let notice = SendMessage::Disconnected(DisconnectedMessage {
            conn_id: a.clone(),
            display_name: "Ann".to_string(),
        });
        assert!(out.iter().all(|o| o.message == notice));

        assert_eq!(state.rooms().members("r1"), &[b]);
        assert_eq!(state.rooms().members("r2"), &[c]);
        assert_eq!(state.registry().lookup(&a), None);
    }

    #[test]
    fn test_disconnect_twice_is_noop() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        join(&mut state, &a, "alpha", "Ann");
        join(&mut state, &b, "alpha", "Bo");

        assert_eq!(state.disconnect(&a).len(), 1);
        assert!(state.disconnect(&a).is_empty());
        assert!(state.disconnect(&ConnId::from("never-joined")).is_empty());
    }

    #[test]
    fn test_last_member_leaving_removes_room() {
        let mut state = RelayState::new();
        let a = ConnId::from("a");
        join(&mut state, &a, "alpha", "Ann");
        assert!(state.disconnect(&a).is_empty());
        assert_eq!(state.rooms().room_count(), 0);
        assert!(state.snapshot("alpha").is_empty());
    }
}
