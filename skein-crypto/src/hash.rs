/// A 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Compute the BLAKE3 hash of the given data.
pub fn blake3_hash(data: &[u8]) -> Digest {
    *blake3::hash(data).as_bytes()
}

/// Hash `data` and render the digest as a `0x`-prefixed lowercase hex string.
pub fn blake3_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(blake3_hash(data)))
}

/// Hash multiple pieces of data together.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
