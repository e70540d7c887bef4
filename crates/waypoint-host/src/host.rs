//! libp2p host construction and bootstrap.
//!
//! The transport stack is TCP (noise + yamux) plus QUIC, with the relay
//! client transport enabled. The behaviour bundles identify, AutoNAT, a
//! relay server, and the rendezvous server that this whole process exists
//! to run.

use std::time::Duration;

use libp2p::identity::Keypair;
use libp2p::swarm::NetworkBehaviour;
use libp2p::{autonat, identify, noise, relay, rendezvous, tcp, yamux, Swarm, SwarmBuilder};
use tracing::info;

use crate::addr::ListenAddrs;
use crate::error::HostError;
use crate::service::DiscoveryService;
use crate::store::RecordStore;

/// Protocol version advertised over identify.
const PROTOCOL_VERSION: &str = "/waypoint/1.0.0";

/// Idle connections are closed after this long. Rendezvous clients connect,
/// register or discover, and leave; there is no reason to hold sockets open.
const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(NetworkBehaviour)]
pub struct HostBehaviour {
    pub identify: identify::Behaviour,
    pub autonat: autonat::Behaviour,
    pub relay: relay::Behaviour,
    pub relay_client: relay::client::Behaviour,
    pub rendezvous: rendezvous::server::Behaviour,
}

impl HostBehaviour {
    fn new(keypair: &Keypair, relay_client: relay::client::Behaviour) -> Self {
        let peer_id = keypair.public().to_peer_id();
        Self {
            identify: identify::Behaviour::new(identify::Config::new(
                PROTOCOL_VERSION.to_string(),
                keypair.public(),
            )),
            autonat: autonat::Behaviour::new(peer_id, autonat::Config::default()),
            relay: relay::Behaviour::new(peer_id, relay::Config::default()),
            relay_client,
            rendezvous: rendezvous::server::Behaviour::new(rendezvous::server::Config::default()),
        }
    }
}

/// Brings up the discovery host.
///
/// Acquisition order is strict: swarm, then listeners in configuration
/// order, then the record store. On any failure everything already acquired
/// is released in reverse before the error propagates: dropping the swarm
/// closes the host, and the store is the last thing opened.
pub async fn bootstrap(
    keypair: Keypair,
    listeners: &ListenAddrs,
    store_urn: &str,
) -> Result<DiscoveryService, HostError> {
    let mut swarm = build_swarm(keypair).map_err(HostError::Build)?;
    info!(peer_id = %swarm.local_peer_id(), "host started");

    for addr in listeners {
        swarm
            .listen_on(addr.clone())
            .map_err(|source| HostError::Listen {
                addr: addr.clone(),
                source,
            })?;
    }

    let store = RecordStore::open(store_urn).await?;
    info!(urn = store_urn, "record store opened");

    Ok(DiscoveryService::new(swarm, store))
}

// The builder phases each carry their own error type; anyhow absorbs them
// and HostError::Build re-wraps the lot.
fn build_swarm(keypair: Keypair) -> anyhow::Result<Swarm<HostBehaviour>> {
    let swarm = SwarmBuilder::with_existing_identity(keypair)
        .with_tokio()
        .with_tcp(
            tcp::Config::default().nodelay(true),
            noise::Config::new,
            yamux::Config::default,
        )?
        .with_quic()
        .with_relay_client(noise::Config::new, yamux::Config::default)?
        .with_behaviour(|key, relay_client| HostBehaviour::new(key, relay_client))?
        .with_swarm_config(|config| config.with_idle_connection_timeout(IDLE_CONNECTION_TIMEOUT))
        .build();
    Ok(swarm)
}
