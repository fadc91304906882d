//! Persistence for confirmation updates.
//!
//! Confirmed values are sealed with AES-256-GCM before they touch disk; the
//! redb table only ever sees nonce-prefixed ciphertext. Keys are string
//! session ids, values are JSON-serialized records.

use std::path::Path;
use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::{expiry_from_now, ImagePayload, SubmissionStatus};

const CONFIRMATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("confirmations");

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Encryption failure: {0}")]
    Encryption(String),

    #[error("I/O failure: {0}")]
    Io(String),
}

fn io<E: std::fmt::Display>(err: E) -> StorageError {
    StorageError::Io(err.to_string())
}

/// Applies exactly one field update per call against the backing store.
///
/// Implementations may fail with an encryption error (sealing the value) or
/// an I/O error (persisting it); the payload is mutated in place on success
/// so the caller's response reflects the update.
pub trait ImageStore: Send + Sync {
    fn apply_nino_update(&self, payload: &mut ImagePayload) -> Result<(), StorageError>;

    fn apply_mobile_update(&self, payload: &mut ImagePayload) -> Result<(), StorageError>;
}

/// One persisted confirmation. `sealed_value` is nonce || ciphertext.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRecord {
    pub session_id: String,
    pub field: String,
    #[serde(with = "hex_bytes")]
    pub sealed_value: Vec<u8>,
    pub expiry_time: u64,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// redb-backed store sealing confirmed values under a single master key.
///
/// Thread-safe via internal Arc. Clone is cheap.
#[derive(Clone)]
pub struct EncryptedStore {
    db: Arc<Database>,
    cipher: Aes256Gcm,
}

impl EncryptedStore {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path, master_key: &[u8; 32]) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }

        let db = Database::create(path).map_err(io)?;
        Self::with_database(db, master_key)
    }

    /// Open an in-memory database, for tests and throwaway environments.
    pub fn open_memory(master_key: &[u8; 32]) -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(io)?;
        Self::with_database(db, master_key)
    }

    fn with_database(db: Database, master_key: &[u8; 32]) -> Result<Self, StorageError> {
        // Just opening the table creates it if it doesn't exist
        let write_txn = db.begin_write().map_err(io)?;
        {
            let _ = write_txn.open_table(CONFIRMATIONS).map_err(io)?;
        }
        write_txn.commit().map_err(io)?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(master_key));
        Ok(Self {
            db: Arc::new(db),
            cipher,
        })
    }

    /// Fetch the persisted record for a session, if any.
    pub fn get(&self, session_id: &str) -> Result<Option<ConfirmationRecord>, StorageError> {
        let read_txn = self.db.begin_read().map_err(io)?;
        let table = read_txn.open_table(CONFIRMATIONS).map_err(io)?;

        match table.get(session_id).map_err(io)? {
            Some(value) => {
                let record = serde_json::from_slice(value.value()).map_err(io)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Recover the plaintext of a sealed value.
    pub fn unseal(&self, sealed: &[u8]) -> Result<String, StorageError> {
        if sealed.len() <= NONCE_LEN {
            return Err(StorageError::Encryption(
                "sealed value too short".to_string(),
            ));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StorageError::Encryption("unable to unseal value".to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|_| StorageError::Encryption("unsealed value is not utf-8".to_string()))
    }

    fn seal(&self, value: &str) -> Result<Vec<u8>, StorageError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, value.as_bytes())
            .map_err(|_| StorageError::Encryption("unable to seal value".to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn put(&self, record: &ConfirmationRecord) -> Result<(), StorageError> {
        let value = serde_json::to_vec(record).map_err(io)?;
        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut table = write_txn.open_table(CONFIRMATIONS).map_err(io)?;
            table
                .insert(record.session_id.as_str(), value.as_slice())
                .map_err(io)?;
        }
        write_txn.commit().map_err(io)?;
        tracing::debug!(session_id = %record.session_id, field = %record.field, "stored confirmation");
        Ok(())
    }

    fn apply_update(
        &self,
        payload: &mut ImagePayload,
        field: &str,
        value: &str,
        status: SubmissionStatus,
    ) -> Result<(), StorageError> {
        let sealed_value = self.seal(value)?;
        let expiry_time = expiry_from_now();
        self.put(&ConfirmationRecord {
            session_id: payload.session_id.clone(),
            field: field.to_string(),
            sealed_value,
            expiry_time,
        })?;

        payload.fitnote_status = status;
        payload.expiry_time = expiry_time;
        Ok(())
    }
}

impl ImageStore for EncryptedStore {
    fn apply_nino_update(&self, payload: &mut ImagePayload) -> Result<(), StorageError> {
        let nino = payload
            .nino
            .clone()
            .ok_or_else(|| StorageError::Io("payload carries no nino".to_string()))?;
        self.apply_update(payload, "nino", &nino, SubmissionStatus::NinoConfirmed)
    }

    fn apply_mobile_update(&self, payload: &mut ImagePayload) -> Result<(), StorageError> {
        let mobile = payload
            .mobile_number
            .clone()
            .ok_or_else(|| StorageError::Io("payload carries no mobile number".to_string()))?;
        self.apply_update(
            payload,
            "mobileNumber",
            &mobile,
            SubmissionStatus::MobileConfirmed,
        )
    }
}

/// Fresh random master key, for environments without a provisioned one.
pub fn random_master_key() -> [u8; 32] {
    Aes256Gcm::generate_key(&mut OsRng).into()
}
