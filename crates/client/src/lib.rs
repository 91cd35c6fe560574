//! Client for the dual-connection file server.
//!
//! Sends the command and a data port over the control connection, then
//! waits for the server to dial back and reads the answer from the data
//! connection.

pub mod client;
pub mod error;

pub use client::{Client, Fetched, Response};
pub use error::ClientError;

use std::time::Duration;

/// How long to wait for the control connection, the server's dial-back,
/// and the intent frame.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);
