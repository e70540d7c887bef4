//! Identity lifecycle for Waypoint nodes.
//!
//! A node identity is an asymmetric keypair in libp2p's private-key encoding.
//! Identities are either loaded from a base64 string produced by
//! `waypointd genkey` or generated fresh for the lifetime of the process.

pub mod algorithm;
pub mod keypair;

mod error;

pub use algorithm::KeyAlgorithm;
pub use error::Error;
pub use keypair::Identity;

pub use libp2p_identity::{Keypair, PeerId};
