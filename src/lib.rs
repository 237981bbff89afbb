//! Key Dashboard
//!
//! Core of a small API key dashboard:
//! - A key list controller that keeps the session's keys in step with a
//!   hosted record store (load, create, rename, delete, reveal)
//! - A key validation flow for the playground page
//! - In-memory and PostgREST record stores

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{ApiKeyId, ApiKeyRecord, DomainError, RecordStore};
use infrastructure::api_key::{InMemoryRecordStore, PostgrestRecordStore, SecretGenerator};
use tracing::info;

use config::StoreBackend;

/// Create the record store selected by the configuration
pub fn create_record_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>, DomainError> {
    let backend = config.store.backend()?;
    info!("Record store backend: {:?}", backend);

    match backend {
        StoreBackend::InMemory => {
            let generator = config.keys.generator()?;
            Ok(Arc::new(InMemoryRecordStore::with_records(default_records(
                &generator,
            ))))
        }
        StoreBackend::Postgrest => Ok(Arc::new(PostgrestRecordStore::new(
            config.store.postgrest(),
        )?)),
    }
}

/// Keys every fresh dashboard starts with
///
/// Secrets are derived from the key names, so they are the same on every
/// run (`tvly-default000...` with the default generator).
pub fn default_records(generator: &SecretGenerator) -> Vec<ApiKeyRecord> {
    ["default", "new-api-key", "cli"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| ApiKeyRecord::new(ApiKeyId::new(id), name, 0, generator.fixed(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_key::{KeyValidator, KeyValidity};

    #[tokio::test]
    async fn test_in_memory_store_is_seeded() {
        let store = create_record_store(&AppConfig::default()).unwrap();

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();

        assert_eq!(names, vec!["default", "new-api-key", "cli"]);
    }

    #[test]
    fn test_seeded_secrets_are_stable() {
        let generator = SecretGenerator::default();

        assert_eq!(default_records(&generator), default_records(&generator));
    }

    #[tokio::test]
    async fn test_seeded_key_validates_on_a_fresh_store() {
        let config = AppConfig::default();
        let secret = config.keys.generator().unwrap().fixed("default");
        let validator = KeyValidator::new(create_record_store(&config).unwrap());

        let result = validator.validate(&secret).await.unwrap();

        match result {
            KeyValidity::Valid(record) => assert_eq!(record.name(), "default"),
            other => panic!("expected valid, got {:?}", other),
        }
    }

    #[test]
    fn test_postgrest_store_requires_url() {
        let mut config = AppConfig::default();
        config.store.backend = "postgrest".to_string();

        let result = create_record_store(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
