//! API Key infrastructure implementations
//!
//! Record store adapters, secret generation, the key list controller and
//! the key validation flow.

mod controller;
mod generator;
mod playground;
mod postgrest;
mod repository;
mod validator;

pub use controller::{
    DeleteState, EditDraft, EditState, KeyListController, KeyListState, SecretVisibility,
    CREATED, CREATE_FAILED, DELETED, DELETE_FAILED, LOAD_FAILED, RENAMED, UPDATE_FAILED,
};
pub use generator::{SecretGenerator, DEFAULT_SECRET_LENGTH, DEFAULT_SECRET_PREFIX};
pub use playground::{Playground, KEY_INVALID, KEY_VALID, VALIDATION_UNAVAILABLE};
pub use postgrest::{PostgrestConfig, PostgrestRecordStore, SINGLE_OBJECT_NO_ROWS};
pub use repository::InMemoryRecordStore;
pub use validator::{KeyValidator, KeyValidity};
