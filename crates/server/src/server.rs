//! Control-port accept loop.
//!
//! Accepts one control connection at a time and runs its session to
//! completion before accepting the next. A failed session is logged and
//! the loop keeps going; only failing to bind stops the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use ftserve_catalog::Catalog;

use crate::ServerError;
use crate::config::ServerConfig;
use crate::dispatch::Outcome;
use crate::session::{Session, SessionState};

/// Pause after a failed accept (e.g. `EMFILE`) before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// The file server.
pub struct FileServer {
    config: ServerConfig,
    catalog: Catalog,
    cancel: CancellationToken,
}

impl FileServer {
    /// Creates a server serving `config.root`.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let catalog = Catalog::new(config.root.clone());
        Arc::new(Self {
            config,
            catalog,
            cancel: CancellationToken::new(),
        })
    }

    /// Stops the accept loop. A session in progress runs to completion first.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Binds the control listener on all interfaces.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr: SocketAddr = ([0, 0, 0, 0], self.config.port).into();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        info!(
            addr = %listener.local_addr()?,
            root = %self.config.root.display(),
            "server open and listening"
        );
        Ok(listener)
    }

    /// Binds and serves until [`shutdown`](Self::shutdown).
    pub async fn run(self: &Arc<Self>) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serves control connections from an already-bound listener.
    pub async fn serve(self: &Arc<Self>, listener: TcpListener) -> Result<(), ServerError> {
        loop {
            debug!(state = %SessionState::Listening, "waiting for client");
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("server shutting down");
                    break Ok(());
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            info!(%peer_addr, "connection from client");
                            let session = Session::new(&self.config, &self.catalog, peer_addr, stream);
                            match session.run().await {
                                Ok(outcome) => log_outcome(peer_addr, &outcome),
                                Err(e) => error!(%peer_addr, "session failed: {e}"),
                            }
                        }
                        Err(e) => {
                            error!("accept error: {e}");
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }
    }
}

fn log_outcome(peer_addr: SocketAddr, outcome: &Outcome) {
    match outcome {
        Outcome::Listed { entries } => info!(%peer_addr, entries, "directory listing sent"),
        Outcome::Sent { name, bytes } => info!(%peer_addr, %name, bytes, "file transfer complete"),
        Outcome::NotFound { name } => info!(%peer_addr, %name, "answered file not found"),
        Outcome::Unknown => info!(%peer_addr, "answered unknown command"),
    }
}
