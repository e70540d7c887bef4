//! SQLite-backed store of live rendezvous registrations.

use std::time::{SystemTime, UNIX_EPOCH};

use libp2p::rendezvous::Registration;
use libp2p::PeerId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreError;

/// URN selecting a non-persistent, process-lifetime store.
pub const MEMORY_URN: &str = ":memory:";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS registrations (
    peer_id    TEXT    NOT NULL,
    namespace  TEXT    NOT NULL,
    addresses  TEXT    NOT NULL,
    expires_at INTEGER NOT NULL,
    PRIMARY KEY (peer_id, namespace)
)";

/// Store of live registrations, addressed by URN.
///
/// `:memory:` keeps records for the lifetime of the process; anything else is
/// treated as a SQLite file path, created on first use. The pool is capped at
/// one connection: for the in-memory case every additional connection would
/// see its own empty database.
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Opens the store at `urn`.
    ///
    /// Rows left over from a previous run that have already expired are
    /// purged here; the running service does not reload them.
    pub async fn open(urn: &str) -> Result<Self, StoreError> {
        let options = if urn == MEMORY_URN {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(urn)
                .create_if_missing(true)
        };

        let open_err = |source| StoreError::Open {
            urn: urn.to_string(),
            source,
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(open_err)?;

        sqlx::query(SCHEMA).execute(&pool).await.map_err(open_err)?;

        let store = Self { pool };
        let purged = store.purge_expired().await?;
        if purged > 0 {
            debug!(purged, "purged stale registrations from a previous run");
        }
        Ok(store)
    }

    /// Inserts or refreshes a registration.
    pub async fn put_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        let peer = registration.record.peer_id().to_base58();
        let namespace = registration.namespace.to_string();
        let addresses = registration
            .record
            .addresses()
            .iter()
            .map(|addr| addr.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let expires_at = unix_now() + registration.ttl as i64;

        sqlx::query(
            "INSERT INTO registrations (peer_id, namespace, addresses, expires_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (peer_id, namespace) DO UPDATE \
             SET addresses = excluded.addresses, expires_at = excluded.expires_at",
        )
        .bind(&peer)
        .bind(&namespace)
        .bind(&addresses)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes one peer's registration in one namespace.
    pub async fn remove_registration(
        &self,
        peer: &PeerId,
        namespace: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM registrations WHERE peer_id = ?1 AND namespace = ?2")
            .bind(peer.to_base58())
            .bind(namespace)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes every expired row, returning how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM registrations WHERE expires_at <= ?1")
            .bind(unix_now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of live registrations.
    pub async fn registration_count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM registrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Closes the store.
    ///
    /// Called exactly once, after the discovery service has stopped
    /// accepting registrations.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
