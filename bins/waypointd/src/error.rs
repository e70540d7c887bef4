use thiserror::Error;

use crate::supervisor::SupervisionError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("identity error: {0}")]
    Identity(#[from] waypoint_identity::Error),

    #[error("listener error: {0}")]
    Listeners(#[from] waypoint_host::AddrError),

    #[error("bootstrap error: {0}")]
    Bootstrap(#[from] waypoint_host::HostError),

    #[error(transparent)]
    Supervision(#[from] SupervisionError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
