//! Dual-connection file server.
//!
//! A client opens a control connection and sends two frames: a command
//! (list the directory, or fetch a file by name) and the port it is
//! listening on. The server then dials back to that port and answers on
//! the new data connection, closing it when done.
//!
//! See [`ftserve_channel`] for the wire format.

mod config;
mod dispatch;
mod error;
mod server;
mod session;
mod transfer;

pub use config::{DATA_CONNECT_DELAY, MAX_PORT, MIN_PORT, SESSION_IO_TIMEOUT, ServerConfig};
pub use dispatch::{Outcome, Request, dispatch};
pub use error::{ServerError, SessionError};
pub use server::FileServer;
pub use session::{SessionState, parse_data_port};
pub use transfer::{send_file, send_listing};
