//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

use ftserve_server::{MAX_PORT, MIN_PORT};

/// Serves directory listings and files; answers arrive on a data
/// connection the server opens back to the client.
#[derive(Clone, Debug, Parser)]
#[command(name = "ftserver", version)]
pub struct ServerOpts {
    /// Control port to listen on (4000-65000)
    #[arg(value_parser = clap::value_parser!(u16).range(MIN_PORT as i64..=MAX_PORT as i64))]
    pub port: u16,

    /// Directory to serve
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Delay before dialing the client's data port, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub data_delay_ms: u64,

    /// Timeout for each handshake step, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_port_in_range() {
        let opts = ServerOpts::try_parse_from(["ftserver", "4000"]).unwrap();
        assert_eq!(opts.port, 4000);
        assert_eq!(opts.root, PathBuf::from("."));
        assert_eq!(opts.data_delay_ms, 1000);

        let opts = ServerOpts::try_parse_from(["ftserver", "65000"]).unwrap();
        assert_eq!(opts.port, 65000);
    }

    #[test]
    fn rejects_port_out_of_range() {
        for port in ["3999", "65001", "0", "70000", "abc"] {
            assert!(
                ServerOpts::try_parse_from(["ftserver", port]).is_err(),
                "{port}"
            );
        }
    }

    #[test]
    fn requires_port() {
        assert!(ServerOpts::try_parse_from(["ftserver"]).is_err());
    }

    #[test]
    fn optional_flags() {
        let opts = ServerOpts::try_parse_from([
            "ftserver",
            "5000",
            "--root",
            "/srv/files",
            "--data-delay-ms",
            "0",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(opts.root, PathBuf::from("/srv/files"));
        assert_eq!(opts.data_delay_ms, 0);
        assert_eq!(opts.timeout_secs, 5);
    }
}
