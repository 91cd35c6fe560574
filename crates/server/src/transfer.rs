//! Transfer engine: streams a listing or file contents over the data connection.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use ftserve_catalog::Catalog;
use ftserve_channel::{ChannelError, DONE_SENTINEL, FRAME_SIZE, send_frame};

use crate::error::SessionError;

/// Sends every catalog entry as a `"<name>\n"` frame, then `"~done\n"`.
///
/// Returns the number of entries sent. If the directory can't be
/// enumerated, nothing is written (not even the sentinel) and the error
/// is returned.
pub async fn send_listing<W: AsyncWrite + Unpin>(
    catalog: &Catalog,
    writer: &mut W,
) -> Result<usize, SessionError> {
    let mut entries = catalog.entries().await?;
    let mut count = 0;

    while let Some(name) = entries.next_name().await? {
        send_frame(writer, &format!("{name}\n")).await?;
        count += 1;
    }

    send_frame(writer, &format!("{DONE_SENTINEL}\n")).await?;
    debug!(entries = count, "listing sent");
    Ok(count)
}

/// Copies `source` to `writer` in [`FRAME_SIZE`] chunks.
///
/// Each chunk writes exactly the bytes read. No terminator is sent; the
/// caller closes the connection to mark the end of the file.
pub async fn send_file<R, W>(name: &str, source: &mut R, writer: &mut W) -> Result<u64, SessionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; FRAME_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = source
            .read(&mut buf)
            .await
            .map_err(|source| SessionError::FileRead {
                name: name.to_owned(),
                source,
            })?;
        if n == 0 {
            break;
        }

        writer
            .write_all(&buf[..n])
            .await
            .map_err(ChannelError::Write)?;
        total += n as u64;
    }

    writer.flush().await.map_err(ChannelError::Write)?;
    debug!(name, bytes = total, "file sent");
    Ok(total)
}
