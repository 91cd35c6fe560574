//! Fixed-size frame send/receive.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ChannelError;
use crate::intent::Intent;
use crate::FRAME_SIZE;

/// One received frame: a zero-initialized buffer and how much of it was read.
#[derive(Clone)]
pub struct Frame {
    buf: [u8; FRAME_SIZE],
    len: usize,
}

impl Frame {
    /// The bytes actually read into the frame.
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of bytes read.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the read produced no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The frame's text: everything up to the first NUL, lossily decoded.
    pub fn text(&self) -> String {
        let bytes = self.bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("len", &self.len)
            .field("text", &self.text())
            .finish()
    }
}

/// Sends `text` as one full frame.
///
/// The text is truncated at [`FRAME_SIZE`] and the rest of the buffer is
/// zero padding. All `FRAME_SIZE` bytes are written.
pub async fn send_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    text: &str,
) -> Result<(), ChannelError> {
    let mut buf = [0u8; FRAME_SIZE];
    let bytes = text.as_bytes();
    let n = bytes.len().min(FRAME_SIZE);
    buf[..n].copy_from_slice(&bytes[..n]);

    writer.write_all(&buf).await.map_err(ChannelError::Write)?;
    writer.flush().await.map_err(ChannelError::Write)?;
    Ok(())
}

/// Sends an intent token, newline-terminated, as one frame.
pub async fn send_intent<W: AsyncWrite + Unpin>(
    writer: &mut W,
    intent: Intent,
) -> Result<(), ChannelError> {
    send_frame(writer, &format!("{}\n", intent.token())).await
}

/// Receives one frame with a single read.
///
/// The result holds whatever that read returned, from zero bytes (peer
/// closed) up to a full frame. No attempt is made to fill the buffer.
pub async fn receive_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Frame, ChannelError> {
    let mut buf = [0u8; FRAME_SIZE];
    let len = reader.read(&mut buf).await.map_err(ChannelError::Read)?;
    Ok(Frame { buf, len })
}

/// Reads exactly one full frame.
///
/// Returns `None` if the connection closed cleanly on a frame boundary.
pub async fn read_full_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Frame>, ChannelError> {
    let mut buf = [0u8; FRAME_SIZE];
    let mut filled = 0;

    while filled < FRAME_SIZE {
        let n = reader
            .read(&mut buf[filled..])
            .await
            .map_err(ChannelError::Read)?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ChannelError::TruncatedFrame(filled));
        }
        filled += n;
    }

    Ok(Some(Frame {
        buf,
        len: FRAME_SIZE,
    }))
}
