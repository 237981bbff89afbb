//! API Key domain
//!
//! Domain types and the record store trait for API key management.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKeyId, ApiKeyPatch, ApiKeyRecord, KeyField, NewApiKey};
pub use repository::RecordStore;
pub use validation::{validate_key_name, KeyNameValidationError, MAX_KEY_NAME_LENGTH};

#[cfg(test)]
pub use repository::mock;
