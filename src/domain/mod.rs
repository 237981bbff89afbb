//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;
pub mod navigation;
pub mod notification;

pub use api_key::{
    validate_key_name, ApiKeyId, ApiKeyPatch, ApiKeyRecord, KeyField, KeyNameValidationError,
    NewApiKey, RecordStore,
};
pub use error::DomainError;
pub use navigation::{Navigator, Route};
pub use notification::{NoopNotifier, Notifier};
