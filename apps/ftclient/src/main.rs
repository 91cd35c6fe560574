//! ftclient: list a server's directory or fetch a file from it.

mod cli;

use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ftserve_channel::{LIST_COMMAND, NO_COMMAND};
use ftserve_client::{Client, Response};

use crate::cli::ClientOpts;

fn main() -> anyhow::Result<()> {
    let opts = ClientOpts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(opts))
}

async fn run(opts: ClientOpts) -> anyhow::Result<()> {
    let server = tokio::net::lookup_host((opts.server.as_str(), opts.port))
        .await
        .with_context(|| format!("failed to resolve {}", opts.server))?
        .next()
        .with_context(|| format!("no address for {}", opts.server))?;

    info!(%server, data_port = opts.data_port, "server resolved");

    let command = opts.command();
    let client = Client::new(server);
    let response = client
        .request(command, opts.data_port)
        .await
        .with_context(|| format!("request to {server} failed"))?;

    match response {
        Response::Listing(names) => {
            println!("Receiving directory structure from {}:{}", opts.server, opts.data_port);
            info!(entries = names.len(), "directory listing received");
            for name in names {
                println!("{name}");
            }
        }
        Response::File(bytes) => {
            let name = opts.get.as_deref().unwrap_or(command);
            let path = save_file(&opts.out, name, &bytes).await?;
            info!(path = %path.display(), bytes = bytes.len(), "file saved");
            println!("File transfer complete: {} ({} bytes)", path.display(), bytes.len());
        }
        Response::NotFound => {
            bail!("{}:{} says FILE NOT FOUND", opts.server, opts.data_port);
        }
        Response::Unknown => {
            bail!("{}:{} says UNKNOWN COMMAND", opts.server, opts.data_port);
        }
    }
    Ok(())
}

/// Writes `bytes` to `dir/name`, refusing to replace an existing file.
async fn save_file(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<std::path::PathBuf> {
    let file_name = Path::new(name)
        .file_name()
        .with_context(|| format!("invalid file name {name:?}"))?;
    let path = dir.join(file_name);

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .with_context(|| format!("can't create {}", path.display()))?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(path)
}

impl ClientOpts {
    /// The command frame this invocation sends.
    fn command(&self) -> &str {
        if self.list {
            LIST_COMMAND
        } else {
            self.get.as_deref().unwrap_or(NO_COMMAND)
        }
    }
}
