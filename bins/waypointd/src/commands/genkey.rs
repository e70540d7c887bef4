//! The `genkey` subcommand: generate and print a private key.

use waypoint_identity::{Identity, KeyAlgorithm};

use crate::cli::GenkeyArgs;
use crate::CliError;

/// Generates a key and writes exactly one base64 line to stdout.
///
/// Nothing is persisted here; feeding the key back in is the operator's
/// job (`waypointd serve --pk <key>`). No network or store I/O happens on
/// this path.
pub fn run(args: GenkeyArgs) -> Result<(), CliError> {
    let algorithm = KeyAlgorithm::parse(&args.key_type)?;
    let identity = Identity::generate(algorithm, args.length)?;
    println!("{}", identity.encode()?);
    Ok(())
}
