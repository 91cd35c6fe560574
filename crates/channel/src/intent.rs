//! Intent tokens: the first frame on every data connection.

use std::fmt;

use crate::trim_token;

/// What the server is about to send on the data connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A directory listing follows, closed by the `~done` sentinel.
    Dir,
    /// Raw file bytes follow until the connection closes.
    Fil,
    /// The requested file does not exist; nothing follows.
    Nof,
    /// The command was not understood; nothing follows.
    Unk,
}

impl Intent {
    /// The token as it appears on the wire, without the trailing newline.
    pub fn token(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Fil => "fil",
            Self::Nof => "nof",
            Self::Unk => "unk",
        }
    }

    /// Recognizes a received intent token. Accepts an optional line ending.
    pub fn parse(text: &str) -> Option<Self> {
        match trim_token(text) {
            "dir" => Some(Self::Dir),
            "fil" => Some(Self::Fil),
            "nof" => Some(Self::Nof),
            "unk" => Some(Self::Unk),
            _ => None,
        }
    }

    /// Whether more data follows this intent on the data connection.
    pub fn has_payload(self) -> bool {
        matches!(self, Self::Dir | Self::Fil)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
