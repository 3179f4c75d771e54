use storage::{Storage, StorageConfig, StorageError};

pub async fn memory_storage() -> Result<Storage, StorageError> {
    Storage::new(StorageConfig::memory()).await
}
