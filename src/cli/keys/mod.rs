//! Key management commands

use std::process::ExitCode;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{ApiKeyId, DomainError, RecordStore};
use crate::infrastructure::api_key::{KeyListController, KeyListState};

use super::{notifier, SharedStore};

#[derive(Args)]
pub struct ListArgs {
    /// Show secrets in clear
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Name to identify the key
    pub name: String,

    /// Monthly usage limit (stored, not enforced)
    #[arg(long)]
    pub monthly_limit: Option<u64>,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: i64,
    pub name: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,

    /// Confirm the deletion
    #[arg(long, short)]
    pub yes: bool,
}

async fn loaded_controller(
    config: &AppConfig,
    store: SharedStore,
) -> anyhow::Result<KeyListController<dyn RecordStore>> {
    let mut controller = KeyListController::new(store, notifier(config))
        .with_generator(config.keys.generator()?);
    controller.load().await?;
    Ok(controller)
}

pub async fn list(config: &AppConfig, store: SharedStore, args: ListArgs) -> anyhow::Result<ExitCode> {
    let mut controller = loaded_controller(config, store).await?;

    if args.reveal {
        for id in controller.state().ids() {
            controller.toggle_secret_visibility(id);
        }
    }

    print_table(controller.state());
    Ok(ExitCode::SUCCESS)
}

pub async fn create(
    config: &AppConfig,
    store: SharedStore,
    args: CreateArgs,
) -> anyhow::Result<ExitCode> {
    let mut controller = loaded_controller(config, store).await?;

    let result = controller
        .create(
            &args.name,
            args.monthly_limit.is_some(),
            args.monthly_limit.unwrap_or_default(),
        )
        .await;

    match result {
        Ok(record) => {
            println!("{}\t{}\t{}", record.id(), record.name(), record.secret());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(controller.state(), e),
    }
}

pub async fn rename(
    config: &AppConfig,
    store: SharedStore,
    args: RenameArgs,
) -> anyhow::Result<ExitCode> {
    let mut controller = loaded_controller(config, store).await?;
    let id = ApiKeyId::new(args.id);

    controller.begin_edit(id)?;
    match controller.rename(id, &args.name).await {
        Ok(_) => {
            print_table(controller.state());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(controller.state(), e),
    }
}

pub async fn delete(
    config: &AppConfig,
    store: SharedStore,
    args: DeleteArgs,
) -> anyhow::Result<ExitCode> {
    let mut controller = loaded_controller(config, store).await?;
    let id = ApiKeyId::new(args.id);

    controller.confirm_delete(id)?;
    if !args.yes {
        if let Some(record) = controller.state().record(id) {
            println!(
                "About to delete '{}' ({}). Re-run with --yes to confirm.",
                record.name(),
                record.id()
            );
        }
        controller.cancel_delete();
        return Ok(ExitCode::FAILURE);
    }

    match controller.delete(id).await {
        Ok(()) => {
            print_table(controller.state());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(controller.state(), e),
    }
}

/// Print a field-level validation message; store failures were already notified
fn report(state: &KeyListState, error: DomainError) -> anyhow::Result<ExitCode> {
    if matches!(error, DomainError::Validation { .. }) {
        let message = state
            .name_error
            .clone()
            .or_else(|| state.editing.as_ref().and_then(|d| d.error.clone()))
            .unwrap_or_else(|| error.to_string());
        eprintln!("{}", message);
        return Ok(ExitCode::FAILURE);
    }

    if error.is_store_error() {
        return Ok(ExitCode::FAILURE);
    }

    Err(error.into())
}

fn print_table(state: &KeyListState) {
    let width = state
        .keys
        .iter()
        .map(|k| k.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!("{:<4} {:<width$} {:>7}  KEY", "ID", "NAME", "USAGE", width = width);
    for key in &state.keys {
        let secret = state.display_secret(key.id()).unwrap_or_default();
        println!(
            "{:<4} {:<width$} {:>7}  {}",
            key.id().value(),
            key.name(),
            key.usage(),
            secret,
            width = width
        );
    }
}
