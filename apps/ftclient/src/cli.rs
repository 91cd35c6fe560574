//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

/// Lists a server's directory (-l) or fetches a file (-g).
#[derive(Clone, Debug, Parser)]
#[command(name = "ftclient", version)]
pub struct ClientOpts {
    /// Server host name or address
    pub server: String,

    /// Server control port
    pub port: u16,

    /// Request the server's directory listing
    #[arg(short = 'l', conflicts_with = "get")]
    pub list: bool,

    /// Fetch the named file
    #[arg(short = 'g', value_name = "FILE")]
    pub get: Option<String>,

    /// Local port the server connects back to
    pub data_port: u16,

    /// Directory to write fetched files into
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}
