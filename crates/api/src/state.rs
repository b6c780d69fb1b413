use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use campus_crush_config::{DIRECTORY_MEMORY, GoogleSettings, Settings};
use campus_crush_services::Dispatcher;
use campus_crush_services::auth::{
    AccessTokenSource, EMULATOR_TOKEN, StaticToken, token_source_from_settings,
};
use campus_crush_services::directory::{Directory, FirestoreDirectory, InMemoryDirectory};
use campus_crush_services::push::{FcmNotifier, LogNotifier, Notifier};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(directory: Arc<dyn Directory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(directory, notifier)),
        }
    }

    /// Wires the directory and notifier selected by settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let google = &settings.google;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(google.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let mut tokens: Option<Arc<dyn AccessTokenSource>> = None;

        let directory: Arc<dyn Directory> = if settings.directory.backend == DIRECTORY_MEMORY {
            match settings.directory.seed_path.as_deref() {
                Some(path) => Arc::new(
                    InMemoryDirectory::from_seed_file(path)
                        .with_context(|| format!("Failed to load seed file {path}"))?,
                ),
                None => Arc::new(InMemoryDirectory::new()),
            }
        } else {
            let directory_tokens: Arc<dyn AccessTokenSource> = if google.uses_emulator() {
                Arc::new(StaticToken::new(EMULATOR_TOKEN))
            } else {
                shared_tokens(&mut tokens, google, &client)?
            };
            Arc::new(FirestoreDirectory::new(
                client.clone(),
                &google.firestore_base_url(),
                &google.project_id,
                &google.database_id,
                directory_tokens,
            ))
        };

        let notifier: Arc<dyn Notifier> = if settings.push.dry_run {
            Arc::new(LogNotifier)
        } else {
            Arc::new(FcmNotifier::new(
                client.clone(),
                &google.fcm_url,
                &google.project_id,
                shared_tokens(&mut tokens, google, &client)?,
            ))
        };

        info!(
            directory = directory.name(),
            dry_run = settings.push.dry_run,
            project_id = %google.project_id,
            "Collaborators wired"
        );

        Ok(Self::new(directory, notifier))
    }
}

/// Builds the Google credential source on first use and shares it afterwards.
fn shared_tokens(
    cache: &mut Option<Arc<dyn AccessTokenSource>>,
    google: &GoogleSettings,
    client: &reqwest::Client,
) -> anyhow::Result<Arc<dyn AccessTokenSource>> {
    if let Some(tokens) = cache {
        return Ok(tokens.clone());
    }
    let tokens = token_source_from_settings(google, client.clone())
        .context("Failed to set up Google credentials")?;
    *cache = Some(tokens.clone());
    Ok(tokens)
}
