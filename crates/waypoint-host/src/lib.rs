//! libp2p host bootstrap and discovery service plumbing for Waypoint.
//!
//! This crate owns everything between the CLI and the rendezvous protocol:
//! listen-address validation, swarm construction, the URN-addressed record
//! store, and the event loop that binds the two together.

pub mod addr;
pub mod host;
pub mod service;
pub mod store;

mod error;

pub use addr::ListenAddrs;
pub use error::{AddrError, HostError, StoreError};
pub use host::bootstrap;
pub use service::DiscoveryService;
pub use store::RecordStore;

pub use libp2p::{Multiaddr, PeerId};
