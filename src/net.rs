//! Connectivity probe
//!
//! Loading a remote track is gated on a single up-front reachability check,
//! queried synchronously right before the load. Nothing re-checks during
//! playback.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Device connectivity as far as we can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Connecting,
    Disconnected,
    Unknown,
}

impl Connectivity {
    /// A load proceeds while connected or still coming up.
    pub fn is_usable(self) -> bool {
        matches!(self, Connectivity::Connected | Connectivity::Connecting)
    }
}

pub trait ConnectivityProbe: Send + Sync {
    fn status(&self) -> Connectivity;
}

/// Probes reachability with a bounded TCP connect to a public resolver.
pub struct TcpProbe {
    target: SocketAddr,
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            target: SocketAddr::from(([1, 1, 1, 1], 53)),
            timeout: Duration::from_secs(2),
        }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn status(&self) -> Connectivity {
        match TcpStream::connect_timeout(&self.target, self.timeout) {
            Ok(_) => Connectivity::Connected,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Connectivity::Disconnected,
            Err(_) => Connectivity::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_and_connecting_are_usable() {
        assert!(Connectivity::Connected.is_usable());
        assert!(Connectivity::Connecting.is_usable());
        assert!(!Connectivity::Disconnected.is_usable());
        assert!(!Connectivity::Unknown.is_usable());
    }
}
