use dpg_types::{DpgError, Result};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest
pub type HashRef = String;

pub fn compute_hash(data: &[u8]) -> HashRef {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash of the compact JSON encoding of `data`
pub fn compute_json_hash<T: serde::Serialize>(data: &T) -> Result<HashRef> {
    let json = serde_json::to_vec(data).map_err(|e| DpgError::Serialization(e.to_string()))?;
    Ok(compute_hash(&json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            compute_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_json_hash_follows_content() {
        let a = compute_json_hash(&serde_json::json!({"epoch": 1})).unwrap();
        let b = compute_json_hash(&serde_json::json!({"epoch": 2})).unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
