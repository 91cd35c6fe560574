//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Lowest control port accepted on the command line.
pub const MIN_PORT: u16 = 4000;

/// Highest control port accepted on the command line.
pub const MAX_PORT: u16 = 65000;

/// Pause before dialing the client's data port, giving its listener time
/// to come up.
pub const DATA_CONNECT_DELAY: Duration = Duration::from_secs(1);

/// Bound on each control read and on the data connection attempt.
pub const SESSION_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Control port to listen on (0 = OS-assigned).
    pub port: u16,
    /// Directory served to clients.
    pub root: PathBuf,
    /// Delay between learning the data port and connecting to it.
    pub data_connect_delay: Duration,
    /// Timeout applied to each blocking step of the handshake.
    pub io_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            root: PathBuf::from("."),
            data_connect_delay: DATA_CONNECT_DELAY,
            io_timeout: SESSION_IO_TIMEOUT,
        }
    }
}
