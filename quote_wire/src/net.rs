//! Multicast defaults and transport configuration.
use serde::{Deserialize, Serialize};

/// Administratively-scoped group the publisher sends to by default.
pub const DEFAULT_GROUP: &str = "239.9.61.1";
/// Default UDP port of the multicast group.
pub const DEFAULT_PORT: u16 = 5000;
/// Default multicast TTL. One hop keeps datagrams on the local segment.
pub const DEFAULT_TTL: u8 = 1;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Settings applied once when the multicast transport is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// IPv4 multicast group address.
    pub group: String,
    /// Destination UDP port.
    pub port: u16,
    /// Multicast time-to-live (hop limit).
    pub ttl: u8,
    /// Local IPv4 address of the NIC used for multicast output.
    /// `None` (or empty) lets the OS pick the interface.
    pub interface: Option<String>,
    /// Deliver our own datagrams to listeners on this host.
    pub loopback: bool,
}

impl TransportConfig {
    /// Creates a configuration for `group:port` with the given TTL and OS defaults
    /// for everything else.
    pub fn new(group: &str, port: u16, ttl: u8) -> Self {
        TransportConfig {
            group: group.to_string(),
            port,
            ttl,
            ..Default::default()
        }
    }

    /// `group:port` string used in logs and errors.
    pub fn target(&self) -> String {
        addr(&self.group, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            group: DEFAULT_GROUP.to_string(),
            port: DEFAULT_PORT,
            ttl: DEFAULT_TTL,
            interface: None,
            loopback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_stay_on_local_segment() {
        let config = TransportConfig::default();
        assert_eq!(config.group, "239.9.61.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.ttl, 1);
        assert_eq!(config.target(), "239.9.61.1:5000");
    }

    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"port": 6000}"#).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.group, DEFAULT_GROUP);
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert!(config.loopback);
        assert!(config.interface.is_none());
    }
}
