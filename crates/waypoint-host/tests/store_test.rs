//! Record store integration tests.

use libp2p::core::PeerRecord;
use libp2p::identity::Keypair;
use libp2p::rendezvous::{Namespace, Registration};
use waypoint_host::RecordStore;

fn test_registration(namespace: &'static str, ttl: u64) -> Registration {
    let keypair = Keypair::generate_ed25519();
    let record = PeerRecord::new(
        &keypair,
        vec!["/ip4/127.0.0.1/tcp/4040".parse().unwrap()],
    )
    .expect("signing a fresh record cannot fail");
    Registration {
        namespace: Namespace::from_static(namespace),
        record,
        ttl,
    }
}

#[tokio::test]
async fn put_then_remove_round_trips() {
    let store = RecordStore::open(":memory:").await.unwrap();
    let registration = test_registration("apps", 7200);
    let peer = registration.record.peer_id();

    store.put_registration(&registration).await.unwrap();
    assert_eq!(store.registration_count().await.unwrap(), 1);

    store.remove_registration(&peer, "apps").await.unwrap();
    assert_eq!(store.registration_count().await.unwrap(), 0);
}

#[tokio::test]
async fn re_registration_refreshes_instead_of_duplicating() {
    let store = RecordStore::open(":memory:").await.unwrap();
    let registration = test_registration("apps", 7200);

    store.put_registration(&registration).await.unwrap();
    store.put_registration(&registration).await.unwrap();

    assert_eq!(store.registration_count().await.unwrap(), 1);
}

#[tokio::test]
async fn same_peer_in_two_namespaces_is_two_registrations() {
    let store = RecordStore::open(":memory:").await.unwrap();
    let keypair = Keypair::generate_ed25519();
    let record = PeerRecord::new(
        &keypair,
        vec!["/ip4/127.0.0.1/tcp/4040".parse().unwrap()],
    )
    .unwrap();

    for namespace in ["apps", "games"] {
        let registration = Registration {
            namespace: Namespace::from_static(namespace),
            record: record.clone(),
            ttl: 7200,
        };
        store.put_registration(&registration).await.unwrap();
    }

    assert_eq!(store.registration_count().await.unwrap(), 2);
}

#[tokio::test]
async fn purge_removes_only_expired_rows() {
    let store = RecordStore::open(":memory:").await.unwrap();

    // ttl 0 expires immediately; the other row outlives the test.
    store
        .put_registration(&test_registration("stale", 0))
        .await
        .unwrap();
    store
        .put_registration(&test_registration("live", 7200))
        .await
        .unwrap();

    let purged = store.purge_expired().await.unwrap();
    assert_eq!(purged, 1);
    assert_eq!(store.registration_count().await.unwrap(), 1);
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen_and_drops_expired() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");
    let urn = path.to_str().unwrap();

    {
        let store = RecordStore::open(urn).await.unwrap();
        store
            .put_registration(&test_registration("stale", 0))
            .await
            .unwrap();
        store
            .put_registration(&test_registration("live", 7200))
            .await
            .unwrap();
        store.close().await;
    }

    // Reopen purges the row that expired while the process was down.
    let store = RecordStore::open(urn).await.unwrap();
    assert_eq!(store.registration_count().await.unwrap(), 1);
}
