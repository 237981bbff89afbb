//! API key validation
//!
//! A key is valid when exactly one stored row carries it as its secret.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::api_key::{ApiKeyRecord, KeyField, RecordStore};
use crate::domain::DomainError;

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidity {
    /// The key matches a stored row
    Valid(ApiKeyRecord),
    /// The store did not find exactly one matching row
    Unauthorized,
}

impl KeyValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Validates candidate keys against the record store
#[derive(Debug)]
pub struct KeyValidator<S>
where
    S: RecordStore + ?Sized,
{
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> KeyValidator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Look the key up by exact match
    ///
    /// Store failures are returned as errors and must not be read as
    /// "invalid key".
    pub async fn validate(&self, candidate: &str) -> Result<KeyValidity, DomainError> {
        if candidate.trim().is_empty() {
            return Err(DomainError::validation("API key is required"));
        }

        match self
            .store
            .find_one_by_field(KeyField::Secret, candidate)
            .await
        {
            Ok(Some(record)) => {
                debug!("API key matched record {}", record.id());
                Ok(KeyValidity::Valid(record))
            }
            Ok(None) => {
                debug!("API key did not match any record");
                Ok(KeyValidity::Unauthorized)
            }
            Err(e) => {
                warn!("Error validating API key: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::mock::{MockRecordStore, StoreOp};
    use crate::domain::api_key::ApiKeyId;
    use crate::infrastructure::api_key::InMemoryRecordStore;

    fn store() -> Arc<MockRecordStore> {
        Arc::new(
            MockRecordStore::new()
                .with_record(ApiKeyRecord::new(ApiKeyId::new(1), "default", 0, "tvly-aaa")),
        )
    }

    #[tokio::test]
    async fn test_present_key_is_valid() {
        let validator = KeyValidator::new(store());

        let result = validator.validate("tvly-aaa").await.unwrap();

        match result {
            KeyValidity::Valid(record) => assert_eq!(record.id(), ApiKeyId::new(1)),
            other => panic!("expected valid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_absent_key_is_unauthorized() {
        let validator = KeyValidator::new(store());

        let result = validator.validate("tvly-zzz").await.unwrap();

        assert_eq!(result, KeyValidity::Unauthorized);
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn test_match_is_exact() {
        let validator = KeyValidator::new(store());

        assert_eq!(
            validator.validate("tvly-aa").await.unwrap(),
            KeyValidity::Unauthorized
        );
        assert_eq!(
            validator.validate(" tvly-aaa").await.unwrap(),
            KeyValidity::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_duplicated_secret_is_unauthorized() {
        let store = Arc::new(
            MockRecordStore::new()
                .with_record(ApiKeyRecord::new(ApiKeyId::new(1), "default", 0, "tvly-dup"))
                .with_record(ApiKeyRecord::new(ApiKeyId::new(2), "cli", 0, "tvly-dup")),
        );
        let validator = KeyValidator::new(store);

        let result = validator.validate("tvly-dup").await.unwrap();

        assert_eq!(result, KeyValidity::Unauthorized);
    }

    #[tokio::test]
    async fn test_duplicated_secret_in_memory_is_unauthorized() {
        let store = Arc::new(InMemoryRecordStore::with_records(vec![
            ApiKeyRecord::new(ApiKeyId::new(1), "default", 0, "tvly-dup"),
            ApiKeyRecord::new(ApiKeyId::new(2), "cli", 0, "tvly-dup"),
        ]));
        let validator = KeyValidator::new(store);

        let result = validator.validate("tvly-dup").await.unwrap();

        assert_eq!(result, KeyValidity::Unauthorized);
    }

    #[tokio::test]
    async fn test_store_outage_is_an_error_not_unauthorized() {
        let store = store();
        store.fail_on(StoreOp::FindOneByField);
        let validator = KeyValidator::new(store);

        let result = validator.validate("tvly-aaa").await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_blank_key_skips_store() {
        let store = store();
        let validator = KeyValidator::new(store.clone());

        let result = validator.validate("  ").await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(store.total_calls(), 0);
    }
}
