use sha2::{Digest, Sha256};

pub const FINGERPRINT_PREFIX: &str = "sha256:";

/// One-way fingerprint stored in place of a provider secret
pub fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.trim().as_bytes());
    format!("{}{}", FINGERPRINT_PREFIX, hex::encode(digest))
}
