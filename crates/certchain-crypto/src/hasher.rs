use certchain_types::BlockHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"certchain-block-v1"`) that is
/// prepended to every hash computation, so two payloads with
/// identical bytes hashed under different tags never share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for sealed blocks.
    pub const BLOCK: Self = Self {
        domain: "certchain-block-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        BlockHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    ///
    /// Callers are responsible for a canonical shape: struct fields in a
    /// fixed order and maps with ordered keys.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<BlockHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &BlockHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use certchain_types::Record;
    use proptest::prelude::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(ContentHasher::BLOCK.hash(data), ContentHasher::BLOCK.hash(data));
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let other = ContentHasher::new("certchain-export-v1");
        assert_ne!(ContentHasher::BLOCK.hash(data), other.hash(data));
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::BLOCK.hash(b"original");
        assert!(ContentHasher::BLOCK.verify(b"original", &id));
        assert!(!ContentHasher::BLOCK.verify(b"tampered", &id));
    }

    #[test]
    fn hash_json_never_yields_sentinel() {
        let value = serde_json::json!({"student": "Ana", "course": "Physics"});
        let id = ContentHasher::BLOCK.hash_json(&value).unwrap();
        assert!(!id.is_sentinel());
    }

    #[test]
    fn custom_domain() {
        let hasher = ContentHasher::new("my-custom-domain-v1");
        assert_eq!(hasher.domain(), "my-custom-domain-v1");
        assert_ne!(hasher.hash(b"data"), ContentHasher::BLOCK.hash(b"data"));
    }

    proptest! {
        #[test]
        fn single_character_change_changes_digest(name in "[a-zA-Z]{1,16}", pos in 0usize..16) {
            let original = Record::certificate(name.clone(), "Physics");
            let mut chars: Vec<char> = name.chars().collect();
            let i = pos % chars.len();
            chars[i] = if chars[i] == 'x' { 'y' } else { 'x' };
            let altered = Record::certificate(chars.into_iter().collect::<String>(), "Physics");

            let a = ContentHasher::BLOCK.hash_json(&original).unwrap();
            let b = ContentHasher::BLOCK.hash_json(&altered).unwrap();
            prop_assert_ne!(a, b);
        }
    }
}
