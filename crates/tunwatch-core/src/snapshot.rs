//! Snapshot payload pushed by the tunnel server's status socket.
//!
//! A snapshot is replaced wholesale on every message; there is no
//! incremental merge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a connection or forwarded socket.
///
/// The server emits integer ids today; string ids are accepted and
/// displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

/// Creation time as reported by the server (epoch seconds or preformatted text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateTime {
    Epoch(f64),
    Text(String),
}

impl fmt::Display for CreateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateTime::Epoch(secs) => write!(f, "{secs}"),
            CreateTime::Text(s) => f.write_str(s),
        }
    }
}

/// One proxied data stream nested under a tunnel connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardedSocket {
    pub id: EntityId,
    pub addr: String,
    pub port: u16,
    pub create_time: CreateTime,
    /// Bytes written towards the local socket.
    pub to_socket: u64,
    /// Bytes read from the local socket.
    pub from_socket: u64,
}

/// A top-level tunnel connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelConnection {
    pub id: EntityId,
    pub mode: String,
    pub host: String,
    pub port: u16,
    pub create_time: CreateTime,
    /// Forwarded sockets in server order.
    pub connections: Vec<ForwardedSocket>,
}

/// One complete point-in-time report of the server's active connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub host: String,
    pub port: u16,
    /// Tunnel connections in server order.
    pub connections: Vec<TunnelConnection>,
}

impl Snapshot {
    /// Parse a text frame from the feed.
    ///
    /// Any structural problem (invalid JSON, missing field, wrong type) is
    /// reported as [`Error::MalformedSnapshot`].
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::malformed_snapshot(e.to_string()))
    }

    /// Number of display rows: one per connection plus one per forwarded socket.
    pub fn row_count(&self) -> usize {
        self.connections.len()
            + self
                .connections
                .iter()
                .map(|c| c.connections.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "host": "0.0.0.0",
        "port": 4430,
        "connections": [
            {
                "id": 1, "mode": "listen", "host": "localhost", "port": 8080,
                "createTime": 1700000000.5,
                "connections": [
                    {"id": 7, "addr": "10.0.0.2", "port": 51234, "createTime": "12:00:01",
                     "toSocket": 1024, "fromSocket": 2048},
                    {"id": 8, "addr": "10.0.0.3", "port": 51235, "createTime": 1700000001,
                     "toSocket": 0, "fromSocket": 17}
                ]
            },
            {
                "id": "b", "mode": "connect", "host": "db", "port": 5432,
                "createTime": "yesterday", "connections": []
            }
        ]
    }"#;

    #[test]
    fn test_parse_full_snapshot() {
        let snap = Snapshot::parse(SAMPLE).unwrap();
        assert_eq!(snap.host, "0.0.0.0");
        assert_eq!(snap.port, 4430);
        assert_eq!(snap.connections.len(), 2);
        assert_eq!(snap.connections[0].id, EntityId::Number(1));
        assert_eq!(snap.connections[1].id, EntityId::Text("b".to_string()));
        assert_eq!(snap.connections[0].connections[0].to_socket, 1024);
        assert_eq!(snap.connections[0].connections[0].from_socket, 2048);
        assert_eq!(
            snap.connections[0].connections[0].create_time,
            CreateTime::Text("12:00:01".to_string())
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let snap = Snapshot::parse(SAMPLE).unwrap();
        let ids: Vec<String> = snap.connections[0]
            .connections
            .iter()
            .map(|f| f.id.to_string())
            .collect();
        assert_eq!(ids, vec!["7", "8"]);
    }

    #[test]
    fn test_row_count() {
        let snap = Snapshot::parse(SAMPLE).unwrap();
        assert_eq!(snap.row_count(), 4);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Snapshot::parse(r#"{"host":"h","port":1,"connections":[]}"#).unwrap();
        assert_eq!(snap.row_count(), 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let snap =
            Snapshot::parse(r#"{"host":"h","port":1,"connections":[],"uptime":99}"#).unwrap();
        assert_eq!(snap.host, "h");
    }

    #[test]
    fn test_missing_connections_is_malformed() {
        let err = Snapshot::parse(r#"{"host":"h","port":1}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot { .. }));
        assert!(err.to_string().contains("connections"));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = Snapshot::parse(r#"{"host":"h","port":"x","connections":[]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_port_out_of_range_is_malformed() {
        let err = Snapshot::parse(r#"{"host":"h","port":70000,"connections":[]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Snapshot::parse("not json").unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_create_time_display() {
        assert_eq!(CreateTime::Epoch(1.5).to_string(), "1.5");
        assert_eq!(CreateTime::Text("now".to_string()).to_string(), "now");
    }
}
