use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};

pub use config::ConfigError as SettingsError;

/// Directory backends understood by the service.
pub const DIRECTORY_FIRESTORE: &str = "firestore";
pub const DIRECTORY_MEMORY: &str = "memory";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub google: GoogleSettings,
    pub directory: DirectorySettings,
    pub push: PushSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on trigger events processed at the same time.
    pub max_instances: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSettings {
    pub project_id: String,
    pub database_id: String,
    /// Path to a service account JSON key.
    pub credentials_path: Option<String>,
    /// Pre-minted bearer token; wins over `credentials_path` when set.
    pub access_token: Option<String>,
    pub firestore_url: String,
    pub fcm_url: String,
    pub token_uri: String,
    /// `host:port` of a local Firestore emulator. Requests go there
    /// unauthenticated-as-owner instead of `firestore_url`.
    pub firestore_emulator_host: Option<String>,
    pub timeout_secs: u64,
}

impl GoogleSettings {
    /// Base URL used for Firestore document reads, honouring the emulator.
    pub fn firestore_base_url(&self) -> String {
        match self.firestore_emulator_host.as_deref() {
            Some(host) if !host.is_empty() => format!("http://{host}"),
            _ => self.firestore_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn uses_emulator(&self) -> bool {
        self.firestore_emulator_host
            .as_deref()
            .is_some_and(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// "firestore" or "memory".
    pub backend: String,
    /// JSON file of `{collection: {id: document}}` loaded into the memory backend.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSettings {
    /// Log payloads instead of calling FCM.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Loads settings from `./config` and the process environment.
    ///
    /// `APP_ENV` selects the per-environment file (defaults to `development`).
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new("config"), &env_name)
    }

    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::from(dir.join("default.toml")).required(false))
            .add_source(File::from(dir.join(format!("{env_name}.toml"))).required(false))
            .add_source(
                Environment::with_prefix("CRUSH")
                    .separator("__")
                    .try_parsing(true),
            );

        let builder = platform_overrides(builder, |key| std::env::var(key).ok())?;
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8080)?
            .set_default("app.max_instances", 10)?
            .set_default("google.project_id", "")?
            .set_default("google.database_id", "(default)")?
            .set_default("google.firestore_url", "https://firestore.googleapis.com")?
            .set_default("google.fcm_url", "https://fcm.googleapis.com")?
            .set_default("google.token_uri", "https://oauth2.googleapis.com/token")?
            .set_default("google.timeout_secs", 30)?
            .set_default("directory.backend", DIRECTORY_FIRESTORE)?
            .set_default("push.dry_run", false)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.max_instances == 0 {
            return Err(ConfigError::Message(
                "app.max_instances must be at least 1".to_string(),
            ));
        }

        match self.directory.backend.as_str() {
            DIRECTORY_FIRESTORE | DIRECTORY_MEMORY => {}
            other => {
                return Err(ConfigError::Message(format!(
                    "unknown directory backend '{other}'"
                )));
            }
        }

        let remote = self.directory.backend == DIRECTORY_FIRESTORE || !self.push.dry_run;
        if remote && self.google.project_id.is_empty() {
            return Err(ConfigError::Message(
                "google.project_id is required unless both the memory directory and push.dry_run are used"
                    .to_string(),
            ));
        }

        if self.google.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "google.timeout_secs cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

/// Applies the variables that hosting platforms and Google client libraries
/// set conventionally, on top of everything else.
fn platform_overrides<F>(
    builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let project = lookup("GOOGLE_CLOUD_PROJECT").or_else(|| lookup("GCLOUD_PROJECT"));

    builder
        .set_override_option("app.port", lookup("PORT"))?
        .set_override_option("google.project_id", project)?
        .set_override_option(
            "google.credentials_path",
            lookup("GOOGLE_APPLICATION_CREDENTIALS"),
        )?
        .set_override_option(
            "google.firestore_emulator_host",
            lookup("FIRESTORE_EMULATOR_HOST"),
        )
}
