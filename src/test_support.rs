//! Test-only helpers that keep production modules lean.

pub mod stores {
    use std::sync::Arc;

    use crate::payload::ImagePayload;
    use crate::storage::{random_master_key, EncryptedStore, ImageStore, StorageError};

    /// In-memory encrypted store under a throwaway key, for isolated tests.
    pub fn memory_store() -> Arc<EncryptedStore> {
        let store = EncryptedStore::open_memory(&random_master_key())
            .expect("in-memory store should open");
        Arc::new(store)
    }

    /// Which storage failure a [`FailingStore`] injects.
    #[derive(Clone, Copy, Debug)]
    pub enum InjectedFailure {
        Encryption,
        Io,
    }

    /// Store that fails every update with the configured failure kind.
    pub struct FailingStore(pub InjectedFailure);

    impl FailingStore {
        fn failure(&self) -> StorageError {
            match self.0 {
                InjectedFailure::Encryption => {
                    StorageError::Encryption("injected encryption failure".to_string())
                }
                InjectedFailure::Io => StorageError::Io("injected i/o failure".to_string()),
            }
        }
    }

    impl ImageStore for FailingStore {
        fn apply_nino_update(&self, _payload: &mut ImagePayload) -> Result<(), StorageError> {
            Err(self.failure())
        }

        fn apply_mobile_update(&self, _payload: &mut ImagePayload) -> Result<(), StorageError> {
            Err(self.failure())
        }
    }
}
