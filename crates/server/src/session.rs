//! One client session: control handshake, data connection, dispatch, teardown.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use ftserve_catalog::Catalog;
use ftserve_channel::receive_frame;

use crate::config::ServerConfig;
use crate::dispatch::{Outcome, Request, dispatch};
use crate::error::SessionError;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Listening,
    Accepted,
    CommandReceived,
    DataPortReceived,
    DataConnected,
    Dispatched,
    DataClosed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Listening => "listening",
            Self::Accepted => "accepted",
            Self::CommandReceived => "command-received",
            Self::DataPortReceived => "data-port-received",
            Self::DataConnected => "data-connected",
            Self::Dispatched => "dispatched",
            Self::DataClosed => "data-closed",
        };
        f.write_str(name)
    }
}

/// A session on an accepted control connection.
pub(crate) struct Session<'a, C> {
    config: &'a ServerConfig,
    catalog: &'a Catalog,
    peer: SocketAddr,
    control: C,
    state: SessionState,
}

impl<'a, C: AsyncRead + Unpin> Session<'a, C> {
    pub(crate) fn new(
        config: &'a ServerConfig,
        catalog: &'a Catalog,
        peer: SocketAddr,
        control: C,
    ) -> Self {
        Self {
            config,
            catalog,
            peer,
            control,
            state: SessionState::Accepted,
        }
    }

    /// Runs the session to completion.
    ///
    /// The data connection is closed before this returns, whether or not
    /// dispatch succeeded; the control connection is closed on drop.
    pub(crate) async fn run(mut self) -> Result<Outcome, SessionError> {
        let timeout = self.config.io_timeout;
        let command = bounded(timeout, self.state, receive_frame(&mut self.control)).await?;
        if command.is_empty() {
            return Err(SessionError::ControlClosed);
        }
        let request = Request::classify(&command.text());
        self.advance(SessionState::CommandReceived);

        let port_frame = bounded(timeout, self.state, receive_frame(&mut self.control)).await?;
        let data_port = parse_data_port(&port_frame.text())?;
        self.advance(SessionState::DataPortReceived);

        tokio::time::sleep(self.config.data_connect_delay).await;
        let mut data = self.connect_data(data_port).await?;
        self.advance(SessionState::DataConnected);

        let result = dispatch(self.catalog, &request, &mut data, data_port).await;
        self.advance(SessionState::Dispatched);

        if let Err(e) = data.shutdown().await {
            debug!(peer = %self.peer, "data connection shutdown: {e}");
        }
        drop(data);
        self.advance(SessionState::DataClosed);

        result
    }

    async fn connect_data(&self, port: u16) -> Result<TcpStream, SessionError> {
        let addr = SocketAddr::new(self.peer.ip(), port);
        match tokio::time::timeout(self.config.io_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(SessionError::DataConnect { addr, source }),
            Err(_) => Err(SessionError::Timeout(self.state)),
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(peer = %self.peer, from = %self.state, to = %next, "session state");
        self.state = next;
    }
}

/// Awaits `fut`, giving up after `timeout` while in `state`.
async fn bounded<T, E>(
    timeout: Duration,
    state: SessionState,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<T, SessionError>
where
    SessionError: From<E>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(SessionError::from),
        Err(_) => Err(SessionError::Timeout(state)),
    }
}

/// Parses the decimal data port a client advertised.
pub fn parse_data_port(text: &str) -> Result<u16, SessionError> {
    let trimmed = text.trim();
    match trimmed.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(SessionError::InvalidDataPort(trimmed.to_owned())),
    }
}
