//! Host lifecycle integration tests.

use std::time::Duration;

use libp2p::identity::Keypair;
use waypoint_host::{bootstrap, HostError, ListenAddrs};

#[tokio::test]
async fn bootstrap_uses_the_supplied_identity() {
    let keypair = Keypair::generate_ed25519();
    let expected = keypair.public().to_peer_id();
    let listeners = ListenAddrs::parse("/ip4/127.0.0.1/tcp/0").unwrap();

    let service = bootstrap(keypair, &listeners, ":memory:").await.unwrap();
    assert_eq!(service.local_peer_id(), expected);
    // A fresh in-memory store starts empty.
    assert_eq!(service.store().registration_count().await.unwrap(), 0);
}

#[tokio::test]
async fn unsupported_listen_address_fails_bootstrap() {
    let keypair = Keypair::generate_ed25519();
    // Plain UDP without QUIC is not served by any configured transport.
    let listeners = ListenAddrs::parse("/ip4/127.0.0.1/udp/0").unwrap();

    let err = bootstrap(keypair, &listeners, ":memory:")
        .await
        .unwrap_err();
    assert!(matches!(err, HostError::Listen { .. }));
}

#[tokio::test]
async fn triggered_shutdown_drains_within_bounded_time() {
    let keypair = Keypair::generate_ed25519();
    let listeners =
        ListenAddrs::parse("/ip4/127.0.0.1/tcp/0,/ip4/127.0.0.1/udp/0/quic-v1").unwrap();
    let service = bootstrap(keypair, &listeners, ":memory:").await.unwrap();

    let (trigger, tripwire) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(service.run(async move {
        let _ = tripwire.await;
    }));

    // Give the event loop a moment to start before interrupting it.
    tokio::time::sleep(Duration::from_millis(100)).await;
    trigger.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("service did not drain in time")
        .expect("service task panicked")
        .expect("service returned an error");
}
