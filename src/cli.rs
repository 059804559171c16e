//! Command-line shapes shared by the binaries.
//!
//! Every program takes fixed positional arguments plus an optional
//! `--config <path>`. Any violation prints the usage banner to stdout and
//! exits with status 1 before a single socket is touched.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::config::{load_config, NetConfig};
use crate::observability::logging::init_logging;

pub const MIN_PORT: u16 = 1024;

/// Bad argument shape or value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentValidationError {
    #[error("port '{0}' is not a number")]
    MalformedPort(String),

    #[error("port {0} is outside 1024-65535")]
    PortOutOfRange(u64),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Decimal port in `[1024, 65535]`.
pub fn parse_port(value: &str) -> Result<u16, ArgumentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ArgumentValidationError::MalformedPort(value.to_string()));
    }

    // Anything too long for u64 is out of range anyway.
    let number: u64 = trimmed.parse().unwrap_or(u64::MAX);
    match u16::try_from(number) {
        Ok(port) if port >= MIN_PORT => Ok(port),
        _ => Err(ArgumentValidationError::PortOutOfRange(number)),
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ArgumentValidationError> {
    if value.is_empty() {
        Err(ArgumentValidationError::Empty(field))
    } else {
        Ok(value.to_string())
    }
}

fn parse_server(value: &str) -> Result<String, ArgumentValidationError> {
    non_empty("server", value)
}

fn parse_message(value: &str) -> Result<String, ArgumentValidationError> {
    non_empty("message", value)
}

/// `server-stream <port>` and `server-datagram <port>`.
#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct ServerArgs {
    #[arg(value_parser = parse_port)]
    pub port: u16,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// `client-stream <server> <port>`.
#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct StreamClientArgs {
    #[arg(value_parser = parse_server)]
    pub server: String,

    #[arg(value_parser = parse_port)]
    pub port: u16,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// `client-datagram <server> <port> <message>`.
#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct DatagramClientArgs {
    #[arg(value_parser = parse_server)]
    pub server: String,

    #[arg(value_parser = parse_port)]
    pub port: u16,

    #[arg(value_parser = parse_message, allow_hyphen_values = true)]
    pub message: String,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// `get-ip <hostname>`.
#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct GetIpArgs {
    pub hostname: String,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub const SERVER_STREAM_USAGE: &str = "Usage: server-stream <port>\n\
Port must be a number between 1024 and 65535";

pub const SERVER_DATAGRAM_USAGE: &str = "Usage: server-datagram <port>\n\
Port must be a number between 1024 and 65535";

pub const CLIENT_STREAM_USAGE: &str = "Usage: client-stream <server> <port>\n\
Server must be the server's host name\n\
Port must be a number between 1024 and 65535";

pub const CLIENT_DATAGRAM_USAGE: &str = "Usage: client-datagram <server> <port> <message>\n\
Server must be the server's host name\n\
Port must be a number between 1024 and 65535\n\
Message must be a string of characters";

pub const GET_IP_USAGE: &str = "Usage: get-ip <hostname>";

/// Parse `std::env::args`, or print `usage` to stdout and exit 1.
pub fn parse_or_usage<T: Parser>(usage: &str) -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            tracing::debug!(error = %e, "Argument validation failed");
            println!("{usage}");
            process::exit(1);
        }
    }
}

/// Load the optional config file and start logging. Exits 1 on a bad file.
pub fn init(config_path: Option<&Path>) -> NetConfig {
    let config = match config_path {
        Some(path) => load_config(path).unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e))),
        None => NetConfig::default(),
    };
    init_logging(&config.observability.log_level);
    config
}

/// One-line diagnostic on stderr, then exit 1.
pub fn fail(error: impl Display) -> ! {
    eprintln!("{error}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_bounds() {
        assert_eq!(parse_port("1024"), Ok(1024));
        assert_eq!(parse_port("65535"), Ok(65535));
        assert_eq!(parse_port("1023"), Err(ArgumentValidationError::PortOutOfRange(1023)));
        assert_eq!(parse_port("65536"), Err(ArgumentValidationError::PortOutOfRange(65536)));
        assert_eq!(parse_port("0"), Err(ArgumentValidationError::PortOutOfRange(0)));
    }

    #[test]
    fn malformed_ports() {
        for bad in ["", "abc", "90a0", "-9000", "0x2328", "9000.0"] {
            assert!(
                matches!(parse_port(bad), Err(ArgumentValidationError::MalformedPort(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn huge_port_is_out_of_range() {
        assert!(matches!(
            parse_port("99999999999999999999999"),
            Err(ArgumentValidationError::PortOutOfRange(_))
        ));
    }

    #[test]
    fn server_shape() {
        let args = ServerArgs::try_parse_from(["server-stream", "9001"]).unwrap();
        assert_eq!(args.port, 9001);
        assert!(args.config.is_none());

        assert!(ServerArgs::try_parse_from(["server-stream"]).is_err());
        assert!(ServerArgs::try_parse_from(["server-stream", "9001", "extra"]).is_err());
        assert!(ServerArgs::try_parse_from(["server-stream", "80"]).is_err());
    }

    #[test]
    fn stream_client_shape() {
        let args = StreamClientArgs::try_parse_from(["client-stream", "localhost", "9001"]).unwrap();
        assert_eq!(args.server, "localhost");
        assert_eq!(args.port, 9001);

        assert!(StreamClientArgs::try_parse_from(["client-stream", "", "9001"]).is_err());
        assert!(StreamClientArgs::try_parse_from(["client-stream", "localhost"]).is_err());
    }

    #[test]
    fn datagram_client_shape() {
        let args =
            DatagramClientArgs::try_parse_from(["client-datagram", "localhost", "9000", "ping"]).unwrap();
        assert_eq!(args.message, "ping");

        assert!(DatagramClientArgs::try_parse_from(["client-datagram", "localhost", "9000", ""]).is_err());
        assert!(DatagramClientArgs::try_parse_from(["client-datagram", "localhost", "9000"]).is_err());
    }

    #[test]
    fn get_ip_shape() {
        let args = GetIpArgs::try_parse_from(["get-ip", "localhost", "--config", "net.toml"]).unwrap();
        assert_eq!(args.hostname, "localhost");
        assert_eq!(args.config.as_deref(), Some(Path::new("net.toml")));

        assert!(GetIpArgs::try_parse_from(["get-ip"]).is_err());
        assert!(GetIpArgs::try_parse_from(["get-ip", "a", "b"]).is_err());
    }

    #[test]
    fn config_flag_is_optional_extra() {
        let args = ServerArgs::try_parse_from(["server-datagram", "9000", "--config", "net.toml"]).unwrap();
        assert_eq!(args.config.as_deref(), Some(Path::new("net.toml")));
    }
}
