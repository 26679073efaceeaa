use {
    base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD},
    rand::RngCore,
    sha2::{Digest, Sha256},
};

use crate::types::PkceChallenge;

/// Generate a PKCE verifier/challenge pair (S256 method).
pub fn generate() -> PkceChallenge {
    let verifier = random_urlsafe(32);
    let digest = Sha256::digest(verifier.as_bytes());
    let challenge = URL_SAFE_NO_PAD.encode(digest);
    PkceChallenge {
        verifier,
        challenge,
    }
}

/// URL-safe base64 encoding of `n` cryptographically random bytes.
pub fn random_urlsafe(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(&bytes)
}
