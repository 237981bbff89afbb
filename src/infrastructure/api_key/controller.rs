//! Key list controller
//!
//! Owns the session's list of API keys and the per-record UI state around
//! it, and keeps the list in step with the record store. Local rows are
//! always replaced by the rows the store returns, never by values built
//! client-side.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::api_key::{
    validate_key_name, ApiKeyId, ApiKeyPatch, ApiKeyRecord, NewApiKey, RecordStore,
};
use crate::domain::notification::Notifier;
use crate::domain::DomainError;

use super::generator::SecretGenerator;

pub const LOAD_FAILED: &str = "Failed to fetch API keys";
pub const CREATE_FAILED: &str = "Failed to create API key";
pub const UPDATE_FAILED: &str = "Failed to update API key";
pub const DELETE_FAILED: &str = "Failed to delete API key";

pub const CREATED: &str = "API key created";
pub const RENAMED: &str = "API key renamed";
pub const DELETED: &str = "API key deleted";

/// Whether a record's secret is shown in clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretVisibility {
    Hidden,
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    PendingConfirmation,
}

/// Unsaved name of the record being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: ApiKeyId,
    pub name: String,
    /// Field-level validation message for the draft
    pub error: Option<String>,
}

/// Snapshot of everything the dashboard renders from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyListState {
    /// Records ascending by id
    pub keys: Vec<ApiKeyRecord>,
    pub visible: BTreeSet<ApiKeyId>,
    pub editing: Option<EditDraft>,
    pub pending_delete: Option<ApiKeyId>,
    pub loading: bool,
    pub last_error: Option<String>,
    /// Field-level validation message for the create form
    pub name_error: Option<String>,
}

impl KeyListState {
    pub fn record(&self, id: ApiKeyId) -> Option<&ApiKeyRecord> {
        self.keys.iter().find(|k| k.id() == id)
    }

    pub fn ids(&self) -> Vec<ApiKeyId> {
        self.keys.iter().map(|k| k.id()).collect()
    }

    pub fn visibility(&self, id: ApiKeyId) -> SecretVisibility {
        if self.visible.contains(&id) {
            SecretVisibility::Shown
        } else {
            SecretVisibility::Hidden
        }
    }

    pub fn edit_state(&self, id: ApiKeyId) -> EditState {
        match &self.editing {
            Some(draft) if draft.id == id => EditState::Editing,
            _ => EditState::Idle,
        }
    }

    pub fn delete_state(&self, id: ApiKeyId) -> DeleteState {
        if self.pending_delete == Some(id) {
            DeleteState::PendingConfirmation
        } else {
            DeleteState::Idle
        }
    }

    /// The secret as the dashboard shows it: in clear when visible, masked otherwise
    pub fn display_secret(&self, id: ApiKeyId) -> Option<String> {
        self.record(id).map(|record| match self.visibility(id) {
            SecretVisibility::Shown => record.secret().to_string(),
            SecretVisibility::Hidden => record.masked_secret(),
        })
    }

    /// Insert a store row at its id position, replacing a row with the same id
    fn upsert(&mut self, record: ApiKeyRecord) {
        let pos = self.keys.partition_point(|k| k.id() < record.id());
        match self.keys.get_mut(pos) {
            Some(existing) if existing.id() == record.id() => *existing = record,
            _ => self.keys.insert(pos, record),
        }
    }

    fn remove(&mut self, id: ApiKeyId) {
        self.keys.retain(|k| k.id() != id);
        self.visible.remove(&id);

        if self.editing.as_ref().is_some_and(|d| d.id == id) {
            self.editing = None;
        }
        if self.pending_delete == Some(id) {
            self.pending_delete = None;
        }
    }

    /// Drop UI state that points at records no longer in the list
    fn prune(&mut self) {
        let ids: BTreeSet<ApiKeyId> = self.keys.iter().map(|k| k.id()).collect();

        self.visible.retain(|id| ids.contains(id));
        if self.editing.as_ref().is_some_and(|d| !ids.contains(&d.id)) {
            self.editing = None;
        }
        if self.pending_delete.is_some_and(|id| !ids.contains(&id)) {
            self.pending_delete = None;
        }
    }
}

/// Controller for the session's API key list
pub struct KeyListController<S>
where
    S: RecordStore + ?Sized,
{
    store: Arc<S>,
    generator: SecretGenerator,
    notifier: Arc<dyn Notifier>,
    state: KeyListState,
    updates: watch::Sender<KeyListState>,
    detached: bool,
}

impl<S: RecordStore + ?Sized> KeyListController<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let (updates, _) = watch::channel(KeyListState::default());

        Self {
            store,
            generator: SecretGenerator::default(),
            notifier,
            state: KeyListState::default(),
            updates,
            detached: false,
        }
    }

    /// Create with a custom secret generator
    pub fn with_generator(mut self, generator: SecretGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn state(&self) -> &KeyListState {
        &self.state
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<KeyListState> {
        self.updates.subscribe()
    }

    /// Tear the controller down; later operations issue no store calls
    pub fn detach(&mut self) {
        debug!("Key list controller detached");
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }

    fn ensure_attached(&self) -> Result<(), DomainError> {
        if self.detached {
            return Err(DomainError::invalid_state("Key list controller is detached"));
        }
        Ok(())
    }

    fn ensure_known(&self, id: ApiKeyId) -> Result<(), DomainError> {
        if self.state.record(id).is_none() {
            return Err(DomainError::invalid_state(format!(
                "API key '{}' is not in the list",
                id
            )));
        }
        Ok(())
    }

    fn begin_remote_call(&mut self) {
        self.state.loading = true;
        self.state.last_error = None;
        self.publish();
    }

    fn fail(&mut self, message: &str, error: &DomainError) {
        warn!("{}: {}", message, error);
        self.state.last_error = Some(message.to_string());
        self.notifier.notify_error(message);
        self.publish();
    }

    /// Replace the list with every row in the store
    pub async fn load(&mut self) -> Result<(), DomainError> {
        self.ensure_attached()?;

        self.begin_remote_call();
        let result = self.store.list_all().await;
        self.state.loading = false;

        match result {
            Ok(mut keys) => {
                keys.sort_by_key(|k| k.id());
                info!("Loaded {} API keys", keys.len());

                self.state.keys = keys;
                self.state.prune();
                self.publish();
                Ok(())
            }
            Err(e) => {
                self.fail(LOAD_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Create a key and append the row the store returns
    ///
    /// The monthly limit is only sent when `usage_limit_enabled` is set and is
    /// not enforced anywhere.
    pub async fn create(
        &mut self,
        name: &str,
        usage_limit_enabled: bool,
        usage_limit: u64,
    ) -> Result<ApiKeyRecord, DomainError> {
        self.ensure_attached()?;

        let name = match validate_key_name(name) {
            Ok(name) => name.to_string(),
            Err(e) => {
                self.state.name_error = Some(e.to_string());
                self.publish();
                return Err(DomainError::validation(e.to_string()));
            }
        };
        self.state.name_error = None;

        let candidate = NewApiKey::new(&name, self.generator.generate())
            .with_monthly_limit(usage_limit_enabled.then_some(usage_limit));

        info!("Creating API key: name={}", name);
        self.begin_remote_call();
        let result = self.store.insert(candidate).await;
        self.state.loading = false;

        match result {
            Ok(record) => {
                info!("API key created: id={}", record.id());
                self.state.upsert(record.clone());
                self.notifier.notify_success(CREATED);
                self.publish();
                Ok(record)
            }
            Err(e) => {
                self.fail(CREATE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Start editing a record's name, replacing any other edit in progress
    pub fn begin_edit(&mut self, id: ApiKeyId) -> Result<(), DomainError> {
        let name = self
            .state
            .record(id)
            .map(|r| r.name().to_string())
            .ok_or_else(|| {
                DomainError::invalid_state(format!("API key '{}' is not in the list", id))
            })?;

        self.state.editing = Some(EditDraft {
            id,
            name,
            error: None,
        });
        self.publish();
        Ok(())
    }

    /// Change the draft name of the record being edited
    pub fn set_draft(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.state.editing.as_mut() {
            draft.name = name.into();
            draft.error = None;
            self.publish();
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.state.editing.take().is_some() {
            self.publish();
        }
    }

    /// Rename the record being edited
    pub async fn rename(
        &mut self,
        id: ApiKeyId,
        new_name: &str,
    ) -> Result<ApiKeyRecord, DomainError> {
        self.ensure_attached()?;

        let draft = match self.state.editing.as_mut() {
            Some(draft) if draft.id == id => draft,
            _ => {
                return Err(DomainError::invalid_state(format!(
                    "API key '{}' is not being edited",
                    id
                )));
            }
        };
        draft.name = new_name.to_string();

        let name = match validate_key_name(new_name) {
            Ok(name) => {
                draft.error = None;
                name.to_string()
            }
            Err(e) => {
                draft.error = Some(e.to_string());
                self.publish();
                return Err(DomainError::validation(e.to_string()));
            }
        };

        info!("Renaming API key: id={}, name={}", id, name);
        self.begin_remote_call();
        let result = self.store.update_by_id(id, ApiKeyPatch::rename(name)).await;
        self.state.loading = false;

        match result {
            Ok(record) => {
                self.state.upsert(record.clone());
                self.state.editing = None;
                self.notifier.notify_success(RENAMED);
                self.publish();
                Ok(record)
            }
            Err(e) => {
                self.fail(UPDATE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Rename the record being edited to the current draft
    pub async fn save_edit(&mut self) -> Result<ApiKeyRecord, DomainError> {
        let (id, name) = self
            .state
            .editing
            .as_ref()
            .map(|d| (d.id, d.name.clone()))
            .ok_or_else(|| DomainError::invalid_state("No API key is being edited"))?;

        self.rename(id, &name).await
    }

    /// Ask for confirmation before deleting a record
    pub fn confirm_delete(&mut self, id: ApiKeyId) -> Result<(), DomainError> {
        self.ensure_known(id)?;

        self.state.pending_delete = Some(id);
        self.publish();
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if self.state.pending_delete.take().is_some() {
            self.publish();
        }
    }

    /// Delete the record awaiting confirmation
    pub async fn delete(&mut self, id: ApiKeyId) -> Result<(), DomainError> {
        self.ensure_attached()?;

        if self.state.pending_delete != Some(id) {
            return Err(DomainError::invalid_state(format!(
                "API key '{}' is not awaiting delete confirmation",
                id
            )));
        }

        info!("Deleting API key: id={}", id);
        self.begin_remote_call();
        let result = self.store.delete_by_id(id).await;
        self.state.loading = false;

        match result {
            Ok(removed) => {
                if !removed {
                    debug!("API key {} was already gone from the store", id);
                }
                self.state.remove(id);
                self.notifier.notify_success(DELETED);
                self.publish();
                Ok(())
            }
            Err(e) => {
                self.fail(DELETE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Flip whether a record's secret is shown, returning the new visibility
    pub fn toggle_secret_visibility(&mut self, id: ApiKeyId) -> SecretVisibility {
        if !self.state.visible.remove(&id) {
            self.state.visible.insert(id);
        }
        self.publish();
        self.state.visibility(id)
    }
}

impl<S: RecordStore + ?Sized> std::fmt::Debug for KeyListController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListController")
            .field("store", &self.store)
            .field("generator", &self.generator)
            .field("state", &self.state)
            .field("detached", &self.detached)
            .finish()
    }
}
