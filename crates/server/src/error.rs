//! Error types for the server and its sessions.

use std::net::SocketAddr;

use ftserve_catalog::CatalogError;
use ftserve_channel::ChannelError;

use crate::session::SessionState;

/// Errors that stop the server itself.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that end a single client session.
///
/// The accept loop logs these and moves on to the next client.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("control connection closed before a command arrived")]
    ControlClosed,

    #[error("invalid data port: {0:?}")]
    InvalidDataPort(String),

    #[error("failed to open data connection to {addr}: {source}")]
    DataConnect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("can't open file {name:?}: {source}")]
    FileOpen {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading file {name:?}: {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out in state {0}")]
    Timeout(SessionState),
}
