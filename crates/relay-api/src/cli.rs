//! CLI definitions for the `chat-relay` binary.

use std::net::IpAddr;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// HTTP relay between a chat frontend and the OpenAI chat completions API.
#[derive(Parser)]
#[command(name = "chat-relay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server.
    Serve {
        /// Loopback host to bind to (`localhost`, `127.0.0.0/8` or `::1`).
        #[arg(
            long,
            env = "CHAT_RELAY_HOST",
            default_value = "127.0.0.1",
            value_parser = parse_loopback_host
        )]
        host: String,

        /// Port to listen on.
        #[arg(short, long, env = "CHAT_RELAY_PORT", default_value = "5001")]
        port: u16,

        /// Debug logging (same as -v).
        #[arg(long)]
        debug: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Accept only hosts that stay on the local machine.
fn parse_loopback_host(host: &str) -> Result<String, String> {
    let is_loopback = host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback());

    if is_loopback {
        Ok(host.to_string())
    } else {
        Err(format!("'{host}' is not a loopback address"))
    }
}

impl Cli {
    /// Default log filter for the chosen verbosity. `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        let debug = matches!(self.command, Commands::Serve { debug: true, .. });
        match self.verbose {
            _ if self.quiet => "error",
            0 if debug => "debug",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
