//! Request/response over a control connection and a dial-back data connection.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use ftserve_channel::{
    DONE_SENTINEL, Intent, LIST_COMMAND, read_full_frame, send_frame, trim_token,
};

use crate::CLIENT_TIMEOUT;
use crate::error::ClientError;

/// A decoded server answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Entry names, in the order the server sent them.
    Listing(Vec<String>),
    /// The complete file contents.
    File(Vec<u8>),
    NotFound,
    Unknown,
}

/// Result of fetching a file by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    File(Vec<u8>),
    NotFound,
}

/// Client for one server.
#[derive(Debug, Clone)]
pub struct Client {
    server: SocketAddr,
    timeout: Duration,
}

impl Client {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: CLIENT_TIMEOUT,
        }
    }

    /// Overrides [`CLIENT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lists the server's directory.
    pub async fn list(&self, data_port: u16) -> Result<Vec<String>, ClientError> {
        match self.request(LIST_COMMAND, data_port).await? {
            Response::Listing(names) => Ok(names),
            other => Err(unexpected(&other)),
        }
    }

    /// Fetches the file `name`.
    pub async fn fetch(&self, name: &str, data_port: u16) -> Result<Fetched, ClientError> {
        match self.request(name, data_port).await? {
            Response::File(bytes) => Ok(Fetched::File(bytes)),
            Response::NotFound => Ok(Fetched::NotFound),
            other => Err(unexpected(&other)),
        }
    }

    /// Sends `command` and reads whatever the server answers.
    ///
    /// The data listener is bound on `data_port` before anything is sent;
    /// pass 0 to let the OS pick one. The port actually bound is the one
    /// advertised to the server.
    pub async fn request(&self, command: &str, data_port: u16) -> Result<Response, ClientError> {
        let listener = TcpListener::bind(("0.0.0.0", data_port)).await?;
        let advertised = listener.local_addr()?.port();
        debug!(port = advertised, "listening for data connection");

        let mut control = bounded(self.timeout, TcpStream::connect(self.server)).await?;
        info!(server = %self.server, "connection established with server");

        send_frame(&mut control, command).await?;
        send_frame(&mut control, &advertised.to_string()).await?;

        let (mut data, addr) = bounded(self.timeout, listener.accept()).await?;
        drop(listener);
        debug!(%addr, "data connection accepted");

        let intent_frame = bounded(self.timeout, read_full_frame(&mut data))
            .await?
            .ok_or_else(|| ClientError::Protocol("data connection closed before intent".into()))?;
        let text = intent_frame.text();
        let intent = Intent::parse(&text)
            .ok_or_else(|| ClientError::Protocol(format!("unexpected intent {text:?}")))?;
        debug!(%intent, "server intent");

        let response = match intent {
            Intent::Dir => Response::Listing(read_listing(&mut data).await?),
            Intent::Fil => {
                let mut bytes = Vec::new();
                data.read_to_end(&mut bytes).await?;
                Response::File(bytes)
            }
            Intent::Nof => Response::NotFound,
            Intent::Unk => Response::Unknown,
        };

        drop(control);
        Ok(response)
    }
}

/// Reads entry frames until the `~done` sentinel.
async fn read_listing<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<String>, ClientError> {
    let mut names = Vec::new();
    loop {
        let frame = read_full_frame(reader)
            .await?
            .ok_or_else(|| ClientError::Protocol("listing ended without sentinel".into()))?;
        let text = frame.text();
        let entry = trim_token(&text);
        if entry == DONE_SENTINEL {
            return Ok(names);
        }
        names.push(entry.to_owned());
    }
}

async fn bounded<T, E>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<T, ClientError>
where
    ClientError: From<E>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(ClientError::from),
        Err(_) => Err(ClientError::Timeout),
    }
}

fn unexpected(response: &Response) -> ClientError {
    let kind = match response {
        Response::Listing(_) => "listing",
        Response::File(_) => "file",
        Response::NotFound => "file not found",
        Response::Unknown => "unknown command",
    };
    ClientError::Protocol(format!("unexpected response: {kind}"))
}
