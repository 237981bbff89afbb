//! Playground command - validates a key

use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{DomainError, Route};
use crate::infrastructure::api_key::Playground;
use crate::infrastructure::navigation::TracingNavigator;

use super::{notifier, SharedStore};

#[derive(Args)]
pub struct ValidateArgs {
    /// The API key to check
    pub key: String,
}

pub async fn validate(
    config: &AppConfig,
    store: SharedStore,
    args: ValidateArgs,
) -> anyhow::Result<ExitCode> {
    let navigator = Arc::new(TracingNavigator::new(Route::Playground));
    let playground = Playground::new(store, notifier(config), navigator.clone());

    match playground.submit(&args.key).await {
        Ok(validity) if validity.is_valid() => {
            println!("Access granted ({})", navigator.current());
            Ok(ExitCode::SUCCESS)
        }
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(DomainError::Validation { message }) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
        Err(e) if e.is_store_error() => Ok(ExitCode::from(2)),
        Err(e) => Err(e.into()),
    }
}
