//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API Key identifier - assigned by the record store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(i64);

impl ApiKeyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ApiKeyId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An API key row as held by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    id: ApiKeyId,
    name: String,
    #[serde(default)]
    usage: u64,
    /// The hosted schema calls the secret column `key`
    #[serde(rename = "key")]
    secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monthly_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    pub fn new(
        id: ApiKeyId,
        name: impl Into<String>,
        usage: u64,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            usage,
            secret: secret.into(),
            monthly_limit: None,
            created_at: None,
        }
    }

    pub fn with_monthly_limit(mut self, limit: Option<u64>) -> Self {
        self.monthly_limit = limit;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> ApiKeyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> u64 {
        self.usage
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn monthly_limit(&self) -> Option<u64> {
        self.monthly_limit
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// The secret with every character replaced by `*`
    pub fn masked_secret(&self) -> String {
        "*".repeat(self.secret.chars().count())
    }

    /// Apply a patch in place (used by stores that keep rows locally)
    pub fn apply(&mut self, patch: &ApiKeyPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

/// A record without an id, sent to the store on insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewApiKey {
    pub name: String,
    pub usage: u64,
    #[serde(rename = "key")]
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<u64>,
}

impl NewApiKey {
    /// Build an insert candidate with zero usage
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: 0,
            secret: secret.into(),
            monthly_limit: None,
        }
    }

    pub fn with_monthly_limit(mut self, limit: Option<u64>) -> Self {
        self.monthly_limit = limit;
        self
    }

    /// Materialize the row the store would hold for this candidate
    pub fn into_record(self, id: ApiKeyId) -> ApiKeyRecord {
        ApiKeyRecord::new(id, self.name, self.usage, self.secret)
            .with_monthly_limit(self.monthly_limit)
            .with_created_at(Utc::now())
    }
}

/// Partial fields for an update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiKeyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApiKeyPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Columns that support exact-match lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Id,
    Name,
    Secret,
}

impl KeyField {
    /// Column name in the hosted schema
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Secret => "key",
        }
    }

    /// Whether the given record holds `value` in this column
    pub fn matches(&self, record: &ApiKeyRecord, value: &str) -> bool {
        match self {
            Self::Id => record.id().to_string() == value,
            Self::Name => record.name() == value,
            Self::Secret => record.secret() == value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_from_store_row() {
        let row = serde_json::json!({
            "id": 1,
            "name": "default",
            "usage": 12,
            "key": "tvly-aaa",
            "created_at": "2024-09-01T10:00:00Z"
        });

        let record: ApiKeyRecord = serde_json::from_value(row).unwrap();

        assert_eq!(record.id(), ApiKeyId::new(1));
        assert_eq!(record.name(), "default");
        assert_eq!(record.usage(), 12);
        assert_eq!(record.secret(), "tvly-aaa");
        assert!(record.monthly_limit().is_none());
        assert!(record.created_at().is_some());
    }

    #[test]
    fn test_new_key_serializes_secret_as_key_column() {
        let candidate = NewApiKey::new("cli", "tvly-bbb");
        let value = serde_json::to_value(&candidate).unwrap();

        assert_eq!(value["name"], "cli");
        assert_eq!(value["usage"], 0);
        assert_eq!(value["key"], "tvly-bbb");
        assert!(value.get("monthly_limit").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_new_key_passes_monthly_limit_through() {
        let candidate = NewApiKey::new("cli", "tvly-bbb").with_monthly_limit(Some(1000));
        let value = serde_json::to_value(&candidate).unwrap();

        assert_eq!(value["monthly_limit"], 1000);
    }

    #[test]
    fn test_into_record_stamps_creation_time() {
        let before = Utc::now();
        let record = NewApiKey::new("cli", "tvly-bbb")
            .with_monthly_limit(Some(1000))
            .into_record(ApiKeyId::new(7));

        assert_eq!(record.id(), ApiKeyId::new(7));
        assert_eq!(record.secret(), "tvly-bbb");
        assert_eq!(record.monthly_limit(), Some(1000));
        assert!(record.created_at().is_some_and(|t| t >= before));
    }

    #[test]
    fn test_masked_secret() {
        let record = ApiKeyRecord::new(ApiKeyId::new(1), "default", 0, "tvly-abc");
        assert_eq!(record.masked_secret(), "********");
    }

    #[test]
    fn test_apply_patch() {
        let mut record = ApiKeyRecord::new(ApiKeyId::new(1), "default", 0, "tvly-abc");
        record.apply(&ApiKeyPatch::rename("prod"));
        assert_eq!(record.name(), "prod");

        record.apply(&ApiKeyPatch::default());
        assert_eq!(record.name(), "prod");
    }

    #[test]
    fn test_key_field_matches() {
        let record = ApiKeyRecord::new(ApiKeyId::new(3), "cli", 0, "tvly-xyz");

        assert!(KeyField::Id.matches(&record, "3"));
        assert!(KeyField::Name.matches(&record, "cli"));
        assert!(KeyField::Secret.matches(&record, "tvly-xyz"));
        assert!(!KeyField::Secret.matches(&record, "tvly-xy"));
        assert_eq!(KeyField::Secret.column(), "key");
    }
}
