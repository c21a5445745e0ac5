//! auth::pkce
//!
//! Proof Key for Code Exchange (RFC 7636) and the `state` parameter.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Only S256 is offered.
pub const CHALLENGE_METHOD: &str = "S256";

const VERIFIER_LEN: usize = 128;
const STATE_LEN: usize = 32;

/// A verifier kept locally and the challenge sent with the authorize URL.
#[derive(Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
}

impl PkceChallenge {
    pub fn generate() -> Self {
        Self::from_verifier(random_url_safe(VERIFIER_LEN))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let digest = Sha256::digest(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(digest);
        Self {
            verifier,
            challenge,
        }
    }
}

impl fmt::Debug for PkceChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkceChallenge")
            .field("verifier", &"[REDACTED]")
            .field("challenge", &self.challenge)
            .finish()
    }
}

/// Random `state` echoed back by the authorization server.
pub fn generate_state() -> String {
    random_url_safe(STATE_LEN)
}

/// `len` characters from the base64url alphabet.
fn random_url_safe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    let mut encoded = URL_SAFE_NO_PAD.encode(bytes);
    encoded.truncate(len);
    encoded
}
