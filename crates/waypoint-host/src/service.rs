//! The discovery service event loop.
//!
//! The rendezvous server behaviour keeps the protocol's working set in
//! memory and reports the registration lifecycle as events; the loop here
//! mirrors that lifecycle into the record store and logs what the host is
//! doing.

use std::future::Future;

use futures::StreamExt;
use libp2p::multiaddr::Protocol;
use libp2p::rendezvous::server::Event as RendezvousEvent;
use libp2p::swarm::SwarmEvent;
use libp2p::{PeerId, Swarm};
use tracing::{debug, info, trace};

use crate::error::HostError;
use crate::host::{HostBehaviour, HostBehaviourEvent};
use crate::store::RecordStore;

/// A bootstrapped discovery host: swarm plus open record store.
///
/// Produced by [`crate::bootstrap`]; consumed by [`DiscoveryService::run`],
/// which owns teardown.
pub struct DiscoveryService {
    swarm: Swarm<HostBehaviour>,
    store: RecordStore,
}

impl DiscoveryService {
    pub(crate) fn new(swarm: Swarm<HostBehaviour>, store: RecordStore) -> Self {
        Self { swarm, store }
    }

    /// The host's peer id.
    pub fn local_peer_id(&self) -> PeerId {
        *self.swarm.local_peer_id()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Drives the service until `shutdown` resolves or a store failure.
    ///
    /// Teardown is the reverse of acquisition and happens on every exit
    /// path, each step exactly once: the loop stops (no new registrations
    /// are accepted), the store closes, the host drops.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send) -> Result<(), HostError> {
        let Self { mut swarm, store } = self;
        let local_peer_id = *swarm.local_peer_id();
        info!(peer_id = %local_peer_id, "discovery service running");

        tokio::pin!(shutdown);
        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, draining discovery service");
                    break Ok(());
                }
                event = swarm.select_next_some() => {
                    if let Err(err) = handle_swarm_event(event, local_peer_id, &store).await {
                        break Err(err);
                    }
                }
            }
        };

        store.close().await;
        info!("record store closed");
        drop(swarm);
        info!("host closed");

        result
    }
}

// Swarm has no Debug of its own; the peer id is the useful part anyway.
impl std::fmt::Debug for DiscoveryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryService")
            .field("peer_id", &self.local_peer_id())
            .finish_non_exhaustive()
    }
}

async fn handle_swarm_event(
    event: SwarmEvent<HostBehaviourEvent>,
    local_peer_id: PeerId,
    store: &RecordStore,
) -> Result<(), HostError> {
    match event {
        SwarmEvent::NewListenAddr { address, .. } => {
            // Host-assigned ports mean the dialable address can differ from
            // the requested one; log the full form peers can use.
            let dialable = address.with(Protocol::P2p(local_peer_id));
            info!(address = %dialable, "listening");
        }
        SwarmEvent::Behaviour(HostBehaviourEvent::Rendezvous(event)) => {
            handle_rendezvous_event(event, store).await?;
        }
        SwarmEvent::Behaviour(HostBehaviourEvent::Identify(event)) => {
            debug!(?event, "identify");
        }
        SwarmEvent::Behaviour(HostBehaviourEvent::Autonat(event)) => {
            debug!(?event, "autonat");
        }
        SwarmEvent::Behaviour(HostBehaviourEvent::Relay(event)) => {
            debug!(?event, "relay");
        }
        SwarmEvent::Behaviour(HostBehaviourEvent::RelayClient(event)) => {
            debug!(?event, "relay client");
        }
        SwarmEvent::ConnectionEstablished { peer_id, .. } => {
            debug!(%peer_id, "connection established");
        }
        SwarmEvent::ConnectionClosed { peer_id, cause, .. } => {
            debug!(%peer_id, ?cause, "connection closed");
        }
        other => trace!(?other, "swarm event"),
    }
    Ok(())
}

async fn handle_rendezvous_event(
    event: RendezvousEvent,
    store: &RecordStore,
) -> Result<(), HostError> {
    match event {
        RendezvousEvent::PeerRegistered { peer, registration } => {
            info!(
                %peer,
                namespace = %registration.namespace,
                ttl = registration.ttl,
                "peer registered",
            );
            store.put_registration(&registration).await?;
        }
        RendezvousEvent::PeerUnregistered { peer, namespace } => {
            info!(%peer, %namespace, "peer unregistered");
            store.remove_registration(&peer, &namespace.to_string()).await?;
        }
        RendezvousEvent::RegistrationExpired(registration) => {
            let peer = registration.record.peer_id();
            info!(
                %peer,
                namespace = %registration.namespace,
                "registration expired",
            );
            store
                .remove_registration(&peer, &registration.namespace.to_string())
                .await?;
        }
        RendezvousEvent::DiscoverServed {
            enquirer,
            registrations,
        } => {
            debug!(%enquirer, count = registrations.len(), "discover served");
        }
        RendezvousEvent::DiscoverNotServed { enquirer, error } => {
            debug!(%enquirer, code = ?error, "discover not served");
        }
        RendezvousEvent::PeerNotRegistered {
            peer,
            namespace,
            error,
        } => {
            debug!(%peer, %namespace, code = ?error, "registration refused");
        }
    }
    Ok(())
}
