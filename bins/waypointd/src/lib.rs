//! Waypoint Daemon Library

pub mod cli;
pub mod commands;
pub mod logging;
pub mod supervisor;

mod error;

pub use error::CliError;
