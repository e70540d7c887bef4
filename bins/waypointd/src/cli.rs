//! Command-line surface.
//!
//! Every flag can also be set through the environment under the `WAYPOINT_`
//! prefix; flags win over environment, environment wins over defaults.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default listener set: one TCP and one QUIC endpoint on all interfaces.
pub const DEFAULT_LISTENERS: &str = "/ip4/0.0.0.0/tcp/4040,/ip4/0.0.0.0/udp/4141/quic-v1";

#[derive(Debug, Parser)]
#[command(
    name = "waypointd",
    version,
    about = "Peer rendezvous and discovery point"
)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Global logging flags, honored by every subcommand.
#[derive(Debug, Args)]
pub struct LogOptions {
    /// Log filter directives, e.g. "info" or "debug,libp2p=warn"
    #[arg(
        long = "log-filter",
        env = "WAYPOINT_LOG_FILTER",
        default_value = "info,libp2p=warn",
        global = true
    )]
    pub filter: String,

    /// Log destination: "stderr", "stdout", or a file path
    #[arg(
        long = "log-file",
        env = "WAYPOINT_LOG_FILE",
        default_value = "stderr",
        global = true
    )]
    pub destination: String,

    /// Log rendering format
    #[arg(
        long = "log-format",
        env = "WAYPOINT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the rendezvous service
    Serve(ServeArgs),
    /// Generate a private key and print it, base64-encoded, to stdout
    Genkey(GenkeyArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Comma-separated list of listen multiaddrs
    #[arg(
        short = 'l',
        long = "listen",
        env = "WAYPOINT_LISTEN",
        default_value = DEFAULT_LISTENERS
    )]
    pub listeners: String,

    /// Base64-encoded private key, as printed by `waypointd genkey`.
    /// Omitted: an ephemeral identity is generated for this run.
    #[arg(long = "pk", env = "WAYPOINT_PK")]
    pub private_key: Option<String>,

    /// Record store URN: a SQLite file path, or ":memory:" for no
    /// persistence across restarts
    #[arg(long = "db", env = "WAYPOINT_DB", default_value = ":memory:")]
    pub store_urn: String,
}

#[derive(Debug, Args)]
pub struct GenkeyArgs {
    /// Key algorithm: Ed25519, ECDSA, Secp256k1, or RSA (case-insensitive)
    #[arg(long = "type", env = "WAYPOINT_TYPE", default_value = "Ed25519")]
    pub key_type: String,

    /// Key length in bits; only RSA honors it
    #[arg(long = "length", env = "WAYPOINT_LENGTH", default_value_t = 2048)]
    pub length: usize,
}
