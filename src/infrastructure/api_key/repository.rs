//! In-memory record store implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::api_key::{
    ApiKeyId, ApiKeyPatch, ApiKeyRecord, KeyField, NewApiKey, RecordStore,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Rows {
    by_id: BTreeMap<ApiKeyId, ApiKeyRecord>,
    last_id: i64,
}

/// In-memory implementation of RecordStore
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: Arc<RwLock<Rows>>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing rows
    pub fn with_records(records: Vec<ApiKeyRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id().value()).max().unwrap_or(0);
        let by_id = records.into_iter().map(|r| (r.id(), r)).collect();

        Self {
            rows: Arc::new(RwLock::new(Rows { by_id, last_id })),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn insert(&self, api_key: NewApiKey) -> Result<ApiKeyRecord, DomainError> {
        let mut rows = self.rows.write().await;

        rows.last_id += 1;
        let record = api_key.into_record(ApiKeyId::new(rows.last_id));
        rows.by_id.insert(record.id(), record.clone());

        Ok(record)
    }

    async fn update_by_id(
        &self,
        id: ApiKeyId,
        patch: ApiKeyPatch,
    ) -> Result<ApiKeyRecord, DomainError> {
        let mut rows = self.rows.write().await;

        let record = rows
            .by_id
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        record.apply(&patch);
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: ApiKeyId) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().await;
        Ok(rows.by_id.remove(&id).is_some())
    }

    async fn find_one_by_field(
        &self,
        field: KeyField,
        value: &str,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        let rows = self.rows.read().await;

        let mut matches = rows.by_id.values().filter(|r| field.matches(r, value));
        let first = matches.next();

        // more than one match reads as no match
        if matches.next().is_some() {
            debug!("More than one row where {} matches", field.column());
            return Ok(None);
        }

        Ok(first.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, secret: &str) -> ApiKeyRecord {
        ApiKeyRecord::new(ApiKeyId::new(id), name, 0, secret)
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_id() {
        let store = InMemoryRecordStore::with_records(vec![
            record(3, "cli", "tvly-c"),
            record(1, "default", "tvly-a"),
            record(2, "new-api-key", "tvly-b"),
        ]);

        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().value())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_insert_assigns_id_after_seeded_rows() {
        let store = InMemoryRecordStore::with_records(vec![record(7, "default", "tvly-a")]);

        let created = store
            .insert(NewApiKey::new("cli", "tvly-b").with_monthly_limit(Some(500)))
            .await
            .unwrap();

        assert_eq!(created.id().value(), 8);
        assert_eq!(created.usage(), 0);
        assert_eq!(created.monthly_limit(), Some(500));
        assert!(created.created_at().is_some());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryRecordStore::new();

        let first = store.insert(NewApiKey::new("a", "tvly-a")).await.unwrap();
        store.delete_by_id(first.id()).await.unwrap();
        let second = store.insert(NewApiKey::new("b", "tvly-b")).await.unwrap();

        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let store = InMemoryRecordStore::with_records(vec![record(1, "default", "tvly-a")]);

        let updated = store
            .update_by_id(ApiKeyId::new(1), ApiKeyPatch::rename("prod"))
            .await
            .unwrap();

        assert_eq!(updated.name(), "prod");
        assert_eq!(updated.secret(), "tvly-a");
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = InMemoryRecordStore::new();

        let result = store
            .update_by_id(ApiKeyId::new(9), ApiKeyPatch::rename("prod"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = InMemoryRecordStore::with_records(vec![record(1, "default", "tvly-a")]);

        assert!(store.delete_by_id(ApiKeyId::new(1)).await.unwrap());
        assert!(!store.delete_by_id(ApiKeyId::new(1)).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_one_by_secret() {
        let store = InMemoryRecordStore::with_records(vec![
            record(1, "default", "tvly-a"),
            record(2, "cli", "tvly-b"),
        ]);

        let found = store
            .find_one_by_field(KeyField::Secret, "tvly-b")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id().value()), Some(2));

        let missing = store
            .find_one_by_field(KeyField::Secret, "tvly-z")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_one_with_multiple_matches_is_none() {
        let store = InMemoryRecordStore::with_records(vec![
            record(1, "dup", "tvly-a"),
            record(2, "dup", "tvly-b"),
        ]);

        let result = store.find_one_by_field(KeyField::Name, "dup").await.unwrap();
        assert!(result.is_none());
    }
}
