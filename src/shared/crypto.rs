//! Hashing, checksumming and random-byte primitives shared across modules.
//!
//! Grounded in the teacher's `token_hasher.rs` (SHA-256 token hashing) and
//! `bcrypt_hasher.rs` (password hashing); widened here to also cover SHA-1
//! content checksums and constant-time comparison per the crypto component.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Lower-case hex SHA-256 of `bytes`. Used for session-token and API-key hashes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex_encode(&digest)
}

/// Standard-alphabet base64 SHA-256 of `bytes`.
pub fn sha256_base64(bytes: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(bytes))
}

/// Raw 20-byte SHA-1 digest of `bytes`, used as the asset content checksum.
pub fn sha1(bytes: &[u8]) -> [u8; 20] {
    let digest = Sha1::digest(bytes);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

pub fn bcrypt_hash(password: &str) -> Result<String, CryptoError> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

pub fn bcrypt_compare(password: &str, hash: &str) -> Result<bool, CryptoError> {
    Ok(bcrypt::verify(password, hash)?)
}

pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

/// Constant-time equality over equal-length byte slices. Mismatched lengths
/// are treated as unequal without short-circuiting on content.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(s, "{:02x}", b).expect("writing to a String cannot fail");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_deterministic_and_lowercase() {
        let a = sha256_hex(b"hello");
        let b = sha256_hex(b"hello");
        assert_eq!(a, b);
        assert_eq!(a, a.to_lowercase());
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn sha1_is_20_bytes() {
        assert_eq!(sha1(b"some file bytes").len(), 20);
    }

    #[test]
    fn bcrypt_round_trips() {
        let hash = bcrypt_hash("correct horse battery staple").unwrap();
        assert!(bcrypt_compare("correct horse battery staple", &hash).unwrap());
        assert!(!bcrypt_compare("wrong", &hash).unwrap());
    }

    #[test]
    fn constant_time_eq_rejects_mismatched_lengths() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
    }
}
