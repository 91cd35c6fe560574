//! Framed message channel for the file server protocol.
//!
//! Every control token travels as one fixed-size frame: the text is copied
//! into a zeroed [`FRAME_SIZE`] buffer and the whole buffer is written.
//! There is no length prefix and no delimiter; the receiver treats the
//! frame as a C string and stops at the first NUL.
//!
//! # Wire format
//!
//! ```text
//! CONTROL (client -> server):
//!   frame 1: command      ("-l", a file name, or "%none")
//!   frame 2: data port    (decimal ASCII)
//!
//! DATA (server -> client):
//!   intent frame: "dir\n" | "fil\n" | "nof\n" | "unk\n"
//!   dir: one "<name>\n" frame per entry, then "~done\n"
//!   fil: raw file bytes, no terminator; the server closes the connection
//! ```

pub mod error;
pub mod intent;
pub mod wire;

pub use error::ChannelError;
pub use intent::Intent;
pub use wire::{Frame, read_full_frame, receive_frame, send_frame, send_intent};

/// Capacity of every frame, and the chunk size for file transfers.
pub const FRAME_SIZE: usize = 500;

/// Command asking for a directory listing.
pub const LIST_COMMAND: &str = "-l";

/// Command a client sends when it has neither a list request nor a file name.
pub const NO_COMMAND: &str = "%none";

/// Sentinel closing a directory listing.
pub const DONE_SENTINEL: &str = "~done";

/// Strips one trailing `\n` or `\r\n` from a received token.
pub fn trim_token(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}
