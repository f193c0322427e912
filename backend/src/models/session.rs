use serde::{Deserialize, Serialize};

use super::Address;

/// Result of `connect`. Passed explicitly to every write so the service
/// holds no connection flag of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ConnectionStateBody", from = "ConnectionStateBody")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(Address),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn address(&self) -> Option<&Address> {
        match self {
            ConnectionState::Connected(address) => Some(address),
            ConnectionState::Disconnected => None,
        }
    }
}

// Wire shape: `{"connected": bool, "address": string | null}`.
#[derive(Serialize, Deserialize)]
struct ConnectionStateBody {
    connected: bool,
    address: Option<Address>,
}

impl From<ConnectionState> for ConnectionStateBody {
    fn from(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Connected(address) => Self {
                connected: true,
                address: Some(address),
            },
            ConnectionState::Disconnected => Self {
                connected: false,
                address: None,
            },
        }
    }
}

impl From<ConnectionStateBody> for ConnectionState {
    fn from(body: ConnectionStateBody) -> Self {
        match (body.connected, body.address) {
            (true, Some(address)) => ConnectionState::Connected(address),
            _ => ConnectionState::Disconnected,
        }
    }
}
