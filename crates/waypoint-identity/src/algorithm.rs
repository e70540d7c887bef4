//! Supported key algorithms.

use libp2p_identity::KeyType;

use crate::Error;

/// A key algorithm supported for node identities.
///
/// The set is closed: everything a serialized identity can carry is listed
/// here, and [`KeyAlgorithm::parse`] is the only way to obtain one from
/// operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Ed25519,
    Ecdsa,
    Secp256k1,
    Rsa,
}

impl KeyAlgorithm {
    /// Parses an algorithm name, case-insensitively.
    ///
    /// Unknown names fail with [`Error::UnsupportedAlgorithm`] carrying the
    /// offending input.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "ecdsa" => Ok(Self::Ecdsa),
            "secp256k1" => Ok(Self::Secp256k1),
            "rsa" => Ok(Self::Rsa),
            _ => Err(Error::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519",
            Self::Ecdsa => "ECDSA",
            Self::Secp256k1 => "Secp256k1",
            Self::Rsa => "RSA",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<KeyType> for KeyAlgorithm {
    fn from(key_type: KeyType) -> Self {
        match key_type {
            KeyType::Ed25519 => Self::Ed25519,
            KeyType::Ecdsa => Self::Ecdsa,
            KeyType::Secp256k1 => Self::Secp256k1,
            KeyType::RSA => Self::Rsa,
        }
    }
}
