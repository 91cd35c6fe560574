//! Request dispatcher: classifies the command and drives the response.

use tokio::io::AsyncWrite;
use tracing::{info, warn};

use ftserve_catalog::Catalog;
use ftserve_channel::{Intent, LIST_COMMAND, NO_COMMAND, send_intent, trim_token};

use crate::error::SessionError;
use crate::transfer::{send_file, send_listing};

/// A classified control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List the served directory.
    List,
    /// Fetch the named file.
    Fetch(String),
    /// The client sent the "no command" sentinel.
    Unknown,
}

impl Request {
    /// Classifies the command text received on the control connection.
    ///
    /// First match wins: the list token, then anything other than the
    /// "no command" sentinel is taken as a file name.
    pub fn classify(command: &str) -> Self {
        let command = trim_token(command);
        if command == LIST_COMMAND {
            Self::List
        } else if command != NO_COMMAND {
            Self::Fetch(command.to_owned())
        } else {
            Self::Unknown
        }
    }
}

/// What a dispatched request put on the data connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `dir`, the entries, and `~done`.
    Listed { entries: usize },
    /// `fil` and the file's bytes.
    Sent { name: String, bytes: u64 },
    /// `nof` only.
    NotFound { name: String },
    /// `unk` only.
    Unknown,
}

/// Answers `request` on the data connection.
///
/// `data_port` is only used for logging.
pub async fn dispatch<W: AsyncWrite + Unpin>(
    catalog: &Catalog,
    request: &Request,
    data: &mut W,
    data_port: u16,
) -> Result<Outcome, SessionError> {
    match request {
        Request::List => {
            info!(data_port, "list directory requested");
            send_intent(data, Intent::Dir).await?;
            let entries = send_listing(catalog, data).await?;
            Ok(Outcome::Listed { entries })
        }
        Request::Fetch(name) => {
            info!(data_port, %name, "file requested");
            let found = match catalog.contains(name).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(data_port, %name, "treating lookup failure as not found: {e}");
                    false
                }
            };
            if !found {
                return not_found(data, name, data_port).await;
            }

            // Open before announcing, so a failed open never looks like an empty file.
            let mut file = catalog
                .open(name)
                .await
                .map_err(|source| SessionError::FileOpen {
                    name: name.clone(),
                    source,
                })?;
            let metadata = file
                .metadata()
                .await
                .map_err(|source| SessionError::FileOpen {
                    name: name.clone(),
                    source,
                })?;
            if !metadata.is_file() {
                return not_found(data, name, data_port).await;
            }

            send_intent(data, Intent::Fil).await?;
            let bytes = send_file(name, &mut file, data).await?;
            info!(data_port, %name, bytes, "file sent");
            Ok(Outcome::Sent {
                name: name.clone(),
                bytes,
            })
        }
        Request::Unknown => {
            info!(data_port, "unknown command");
            send_intent(data, Intent::Unk).await?;
            Ok(Outcome::Unknown)
        }
    }
}

async fn not_found<W: AsyncWrite + Unpin>(
    data: &mut W,
    name: &str,
    data_port: u16,
) -> Result<Outcome, SessionError> {
    info!(data_port, %name, "file not found");
    send_intent(data, Intent::Nof).await?;
    Ok(Outcome::NotFound {
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use ftserve_channel::{FRAME_SIZE, read_full_frame};

    async fn first_frame(buf: &[u8]) -> String {
        let mut cursor = buf;
        read_full_frame(&mut cursor).await.unwrap().unwrap().text()
    }

    #[test]
    fn classify_list_token() {
        assert_eq!(Request::classify("-l"), Request::List);
        assert_eq!(Request::classify("-l\n"), Request::List);
    }

    #[test]
    fn classify_file_names() {
        assert_eq!(Request::classify("a.txt"), Request::Fetch("a.txt".into()));
        assert_eq!(Request::classify("-lfoo"), Request::Fetch("-lfoo".into()));
        assert_eq!(Request::classify("%none.txt"), Request::Fetch("%none.txt".into()));
    }

    #[test]
    fn classify_unknown() {
        assert_eq!(Request::classify("%none"), Request::Unknown);
        assert_eq!(Request::classify("%none\n"), Request::Unknown);
    }

    #[test]
    fn classify_empty_text_as_file_name() {
        // An all-zero frame decodes to empty text.
        assert_eq!(Request::classify(""), Request::Fetch(String::new()));
        assert_eq!(Request::classify("\n"), Request::Fetch(String::new()));
    }

    #[tokio::test]
    async fn list_sends_dir_then_entries() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let catalog = Catalog::new(tmp.path());

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &Request::List, &mut buf, 5001)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Listed { entries: 1 });
        assert_eq!(first_frame(&buf).await, "dir\n");
        assert_eq!(buf.len(), 3 * FRAME_SIZE);
    }

    #[tokio::test]
    async fn existing_file_sends_fil_then_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "hello").unwrap();
        let catalog = Catalog::new(tmp.path());

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &Request::Fetch("a.txt".into()), &mut buf, 5001)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Sent {
                name: "a.txt".into(),
                bytes: 5
            }
        );
        assert_eq!(first_frame(&buf).await, "fil\n");
        assert_eq!(&buf[FRAME_SIZE..], b"hello");
    }

    #[tokio::test]
    async fn missing_file_sends_only_nof() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(tmp.path());

        let mut buf = Vec::new();
        let outcome = dispatch(
            &catalog,
            &Request::Fetch("missing.txt".into()),
            &mut buf,
            5001,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::NotFound {
                name: "missing.txt".into()
            }
        );
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "nof\n");
    }

    #[tokio::test]
    async fn path_outside_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub/inner.txt"), "x").unwrap();
        let catalog = Catalog::new(tmp.path());

        for name in ["sub/inner.txt", "../etc/passwd", "/etc/passwd"] {
            let mut buf = Vec::new();
            let outcome = dispatch(&catalog, &Request::Fetch(name.into()), &mut buf, 5001)
                .await
                .unwrap();
            assert!(matches!(outcome, Outcome::NotFound { .. }), "{name}");
            assert_eq!(first_frame(&buf).await, "nof\n");
        }
    }

    #[tokio::test]
    async fn fetch_with_unavailable_directory_sends_only_nof() {
        let catalog = Catalog::new("/definitely/not/real");

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &Request::Fetch("a.txt".into()), &mut buf, 5001)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::NotFound {
                name: "a.txt".into()
            }
        );
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "nof\n");
    }

    #[tokio::test]
    async fn list_of_unavailable_directory_sends_only_dir() {
        let catalog = Catalog::new("/definitely/not/real");

        let mut buf = Vec::new();
        let err = dispatch(&catalog, &Request::List, &mut buf, 5001)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Catalog(_)));
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "dir\n");
    }

    #[tokio::test]
    async fn subdirectory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("subdir")).unwrap();
        let catalog = Catalog::new(tmp.path());

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &Request::Fetch("subdir".into()), &mut buf, 5001)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::NotFound {
                name: "subdir".into()
            }
        );
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "nof\n");
    }

    #[tokio::test]
    async fn all_zero_command_frame_sends_only_nof() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let catalog = Catalog::new(tmp.path());

        let zeros = [0u8; FRAME_SIZE];
        let mut cursor = &zeros[..];
        let command = read_full_frame(&mut cursor).await.unwrap().unwrap();
        let request = Request::classify(&command.text());

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &request, &mut buf, 5001).await.unwrap();

        assert_eq!(outcome, Outcome::NotFound { name: String::new() });
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "nof\n");
    }

    #[tokio::test]
    async fn unknown_sends_only_unk() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(tmp.path());

        let mut buf = Vec::new();
        let outcome = dispatch(&catalog, &Request::Unknown, &mut buf, 5001)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unknown);
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(first_frame(&buf).await, "unk\n");
    }

    #[tokio::test]
    async fn repeated_requests_are_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();
        std::fs::write(tmp.path().join("b.txt"), "bb").unwrap();
        let catalog = Catalog::new(tmp.path());

        for request in [Request::List, Request::Fetch("b.txt".into())] {
            let mut first = Vec::new();
            let mut second = Vec::new();
            dispatch(&catalog, &request, &mut first, 5001).await.unwrap();
            dispatch(&catalog, &request, &mut second, 5001).await.unwrap();
            assert_eq!(first, second);
        }
    }
}
