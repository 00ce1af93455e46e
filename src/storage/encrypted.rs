//! Encrypted wrapper over a storage backend.
//!
//! Values are sealed with AES-256-GCM under a key derived from a namespace
//! seed. The stored form is base64 of `nonce || ciphertext` with a random
//! 12-byte nonce. Encryption stays an internal detail: callers get the
//! plain `get`/`set`/`remove` interface and never see key material.
//!
//! A value that fails to decrypt (tampered, or sealed under a different
//! namespace) is logged as a warning and evicted; it never surfaces as an
//! error or a crash.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};

use crate::storage::backend::{StorageBackend, StorageError};

const NONCE_LEN: usize = 12;

/// Encrypted key-value store over an arbitrary backend.
pub struct EncryptedStore<B> {
    cipher: Aes256Gcm,
    backend: B,
}

impl<B: StorageBackend> EncryptedStore<B> {
    /// Create a store whose key is derived from `namespace`.
    ///
    /// The namespace doubles as tamper scoping: entries sealed under one
    /// namespace will not decrypt under another.
    pub fn new(namespace: &str, backend: B) -> Self {
        let key = Sha256::digest(namespace.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
            backend,
        }
    }

    /// Fetch and decrypt a value.
    ///
    /// Malformed or tampered entries are removed and reported as absent.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(stored) = self.backend.load(key)? else {
            return Ok(None);
        };

        match self.open(&stored) {
            Some(plaintext) => Ok(Some(plaintext)),
            None => {
                tracing::warn!(key, "removing undecryptable storage entry");
                self.backend.remove(key)?;
                Ok(None)
            }
        }
    }

    /// Encrypt and persist a value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, value.as_bytes())
            .map_err(|_| StorageError::Crypto)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(nonce.as_slice());
        combined.extend_from_slice(&ciphertext);

        self.backend.store(key, &BASE64.encode(combined))
    }

    /// Remove a value.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }

    fn open(&self, stored: &str) -> Option<String> {
        let combined = BASE64.decode(stored).ok()?;
        if combined.len() < NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok()?;
        String::from_utf8(plaintext).ok()
    }
}
