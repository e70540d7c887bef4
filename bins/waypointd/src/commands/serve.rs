//! The `serve` subcommand: bring up the discovery host and supervise it.

use tracing::info;
use waypoint_host::{bootstrap, ListenAddrs};
use waypoint_identity::Identity;

use crate::cli::ServeArgs;
use crate::supervisor::{ActorError, Supervisor};
use crate::CliError;

/// Runs the rendezvous service until an operator interrupt or a terminal
/// failure.
///
/// Acquisition is strictly sequential (identity, addresses, host, store,
/// service) and only then does supervision begin. Teardown happens inside
/// the service runner in the reverse order.
pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    let identity = Identity::resolve(args.private_key.as_deref())?;
    info!(
        peer_id = %identity.peer_id(),
        algorithm = %identity.algorithm(),
        "identity resolved",
    );

    let listeners = ListenAddrs::parse(&args.listeners)?;
    info!(%listeners, "listen addresses resolved");

    let service = bootstrap(identity.into_keypair(), &listeners, &args.store_urn).await?;

    let mut supervisor = Supervisor::new();
    supervisor.add("signal-watcher", |mut shutdown| async move {
        tokio::select! {
            _ = shutdown_signal() => info!("interrupt received"),
            _ = shutdown.recv() => {}
        }
        Ok(())
    });
    supervisor.add("service-runner", move |mut shutdown| async move {
        service
            .run(async move { shutdown.recv().await })
            .await
            .map_err(|err| ActorError::Failed(err.into()))
    });

    supervisor.run().await?;
    info!("shutdown complete");
    Ok(())
}

/// Wait for an operator interrupt (Ctrl+C, or SIGTERM on unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
