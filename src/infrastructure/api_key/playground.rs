//! Playground flow: validate a key, then tell the user and move on

use std::sync::Arc;

use tracing::info;

use crate::domain::api_key::RecordStore;
use crate::domain::navigation::{Navigator, Route};
use crate::domain::notification::Notifier;
use crate::domain::DomainError;

use super::validator::{KeyValidator, KeyValidity};

pub const KEY_VALID: &str = "API key is valid!";
pub const KEY_INVALID: &str = "API key is not valid. Please check and try again.";
pub const VALIDATION_UNAVAILABLE: &str = "Unable to validate API key. Please try again later.";

/// Key validation page
pub struct Playground<S>
where
    S: RecordStore + ?Sized,
{
    validator: KeyValidator<S>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl<S: RecordStore + ?Sized> Playground<S> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            validator: KeyValidator::new(store),
            notifier,
            navigator,
        }
    }

    /// Validate the submitted key
    ///
    /// A valid key leads to the protected page. Blank input is rejected
    /// without a notification.
    pub async fn submit(&self, candidate: &str) -> Result<KeyValidity, DomainError> {
        match self.validator.validate(candidate).await {
            Ok(KeyValidity::Valid(record)) => {
                info!("API key validated for record {}", record.id());
                self.notifier.notify_success(KEY_VALID);
                self.navigator.navigate_to(Route::Protected);
                Ok(KeyValidity::Valid(record))
            }
            Ok(KeyValidity::Unauthorized) => {
                self.notifier.notify_error(KEY_INVALID);
                Ok(KeyValidity::Unauthorized)
            }
            Err(e) if e.is_store_error() => {
                self.notifier.notify_error(VALIDATION_UNAVAILABLE);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
