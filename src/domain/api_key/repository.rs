//! Record store trait for API keys

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKeyId, ApiKeyPatch, ApiKeyRecord, KeyField, NewApiKey};
use crate::domain::DomainError;

/// Remote store holding API key rows
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// List every row, ascending by id
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Insert a row; the store assigns the id and returns the stored row
    async fn insert(&self, api_key: NewApiKey) -> Result<ApiKeyRecord, DomainError>;

    /// Update fields of the row with the given id and return the stored row
    async fn update_by_id(
        &self,
        id: ApiKeyId,
        patch: ApiKeyPatch,
    ) -> Result<ApiKeyRecord, DomainError>;

    /// Delete the row with the given id, returns true if a row was removed
    async fn delete_by_id(&self, id: ApiKeyId) -> Result<bool, DomainError>;

    /// Find the single row whose `field` equals `value`
    ///
    /// `Ok(None)` means the store did not find exactly one row (none, or
    /// more than one) and is not an error.
    async fn find_one_by_field(
        &self,
        field: KeyField,
        value: &str,
    ) -> Result<Option<ApiKeyRecord>, DomainError>;
}
