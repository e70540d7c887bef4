//! Error types for address parsing, host bootstrap, and the record store.

use libp2p::{Multiaddr, TransportError};
use thiserror::Error;

/// Listen address parsing error.
#[derive(Debug, Error)]
pub enum AddrError {
    /// The configuration string contained no addresses at all.
    #[error("listener list is empty")]
    Empty,

    /// A token between commas was empty. The multiaddr grammar accepts the
    /// empty string, so this needs its own rejection.
    #[error("empty listen address at position {0}")]
    EmptyAddress(usize),

    /// A token failed to parse as a multiaddr.
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: libp2p::multiaddr::Error,
    },
}

/// Host bootstrap and runtime error.
///
/// Every variant is terminal for `serve`: bootstrap failures are
/// configuration or environment problems, never retried.
#[derive(Debug, Error)]
pub enum HostError {
    /// Swarm construction failed.
    #[error("failed to build host: {0:#}")]
    Build(anyhow::Error),

    /// A resolved listen address was rejected by the transport stack.
    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: Multiaddr,
        #[source]
        source: TransportError<std::io::Error>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Record store error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open record store '{urn}': {source}")]
    Open {
        urn: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("record store query failed: {0}")]
    Query(#[from] sqlx::Error),
}
