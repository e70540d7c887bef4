//! Error types for identity operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base64 encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("invalid key format: {0}")]
    InvalidKeyFormat(libp2p_identity::DecodingError),

    #[error("unsupported key algorithm '{0}', expected one of: Ed25519, ECDSA, Secp256k1, RSA")]
    UnsupportedAlgorithm(String),

    #[error("invalid RSA key length {0}, must be between 2048 and 8192 bits")]
    InvalidKeyLength(usize),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key serialization failed: {0}")]
    Serialization(String),
}
