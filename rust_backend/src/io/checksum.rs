//! Content identity of uploaded inputs.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of raw bytes.
///
/// # Returns
/// Hexadecimal string representation of the hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Incremental fingerprint over several tagged byte blobs.
///
/// Each part is hashed as `tag`, its length, then its bytes, so that moving
/// bytes from one part to the next changes the result.
#[derive(Clone, Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, tag: &str, bytes: &[u8]) -> &mut Self {
        for part in [tag.as_bytes(), bytes] {
            self.hasher.update((part.len() as u64).to_le_bytes());
            self.hasher.update(part);
        }
        self
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = b"Start time,Account\n";
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum(b"a"), calculate_checksum(b"b"));
    }

    #[test]
    fn test_fingerprint_is_boundary_sensitive() {
        let mut a = Fingerprint::new();
        a.update("call_log", b"ab").update("roster", b"c");
        let mut b = Fingerprint::new();
        b.update("call_log", b"a").update("roster", b"bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_fingerprint_is_tag_sensitive() {
        let mut a = Fingerprint::new();
        a.update("call_log", b"x");
        let mut b = Fingerprint::new();
        b.update("roster", b"x");
        assert_ne!(a.finish(), b.finish());
    }
}
