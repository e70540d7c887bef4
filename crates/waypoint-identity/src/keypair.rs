//! Node identity keypairs: loading, generation, and encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use libp2p_identity::{Keypair, PeerId};
use rsa::pkcs8::EncodePrivateKey;

use crate::{Error, KeyAlgorithm};

/// Bit-length bounds accepted for RSA generation. These match the limits the
/// underlying key codec enforces on load.
const RSA_MIN_BITS: usize = 2048;
const RSA_MAX_BITS: usize = 8192;

/// A node identity.
///
/// Wraps a libp2p keypair. An identity is produced exactly one way per
/// process: decoded from caller-supplied bytes, or generated fresh.
#[derive(Clone)]
pub struct Identity {
    keypair: Keypair,
}

impl Identity {
    /// Loads an identity from a base64-encoded private key, or generates an
    /// ephemeral one when no key is supplied.
    ///
    /// The encoded form embeds the algorithm; callers never choose one on
    /// this path. The generated fallback is always Ed25519 and lives only as
    /// long as the process; a deployment that needs a stable peer id must
    /// pass a key produced by `waypointd genkey`.
    pub fn resolve(encoded: Option<&str>) -> Result<Self, Error> {
        let keypair = match encoded {
            Some(encoded) => {
                let bytes = BASE64.decode(encoded)?;
                Keypair::from_protobuf_encoding(&bytes).map_err(Error::InvalidKeyFormat)?
            }
            None => Keypair::generate_ed25519(),
        };
        Ok(Self { keypair })
    }

    /// Generates a new identity with the given algorithm.
    ///
    /// All generation draws from the operating system's CSPRNG; the output is
    /// a long-lived credential. `bits` applies to RSA only; the other
    /// algorithms have fixed parameters.
    pub fn generate(algorithm: KeyAlgorithm, bits: usize) -> Result<Self, Error> {
        let keypair = match algorithm {
            KeyAlgorithm::Ed25519 => Keypair::generate_ed25519(),
            KeyAlgorithm::Ecdsa => Keypair::generate_ecdsa(),
            KeyAlgorithm::Secp256k1 => Keypair::generate_secp256k1(),
            KeyAlgorithm::Rsa => generate_rsa(bits)?,
        };
        Ok(Self { keypair })
    }

    /// Serializes the private key and base64-encodes it.
    ///
    /// The output round-trips through [`Identity::resolve`].
    pub fn encode(&self) -> Result<String, Error> {
        let bytes = self
            .keypair
            .to_protobuf_encoding()
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(BASE64.encode(bytes))
    }

    /// The peer id derived from the public key.
    pub fn peer_id(&self) -> PeerId {
        self.keypair.public().to_peer_id()
    }

    /// The algorithm this identity's keypair uses.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.keypair.key_type().into()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn into_keypair(self) -> Keypair {
        self.keypair
    }
}

// Keeps private key material out of logs.
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("peer_id", &self.peer_id())
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// RSA generation goes through the `rsa` crate: libp2p can only load RSA
/// keys from PKCS#8, not generate them.
fn generate_rsa(bits: usize) -> Result<Keypair, Error> {
    if !(RSA_MIN_BITS..=RSA_MAX_BITS).contains(&bits) {
        return Err(Error::InvalidKeyLength(bits));
    }

    let key = rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
        .map_err(|e| Error::KeyGeneration(e.to_string()))?;
    let document = key
        .to_pkcs8_der()
        .map_err(|e| Error::KeyGeneration(e.to_string()))?;

    let mut der = document.as_bytes().to_vec();
    Keypair::rsa_from_pkcs8(&mut der).map_err(|e| Error::KeyGeneration(e.to_string()))
}
