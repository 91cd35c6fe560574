//! Error types for the client.

use ftserve_channel::ChannelError;

/// Errors produced by [`Client`](crate::Client).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("timed out waiting for the server")]
    Timeout,
}
