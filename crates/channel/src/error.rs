//! Error types for the message channel.

/// Errors produced while moving frames over a connection.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("connection closed mid-frame after {0} bytes")]
    TruncatedFrame(usize),
}
