use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, Map};
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "collector";

/// Tunables come from `COLLECTOR_*` variables, e.g. `COLLECTOR_MAX_PAGES`.
const ENV_PREFIX: &str = "COLLECTOR";

/// Credentials keep their conventional names and win over every other layer.
const CREDENTIAL_VARS: [(&str, &str); 4] = [
    ("ADZUNA_APP_ID", "adzuna_app_id"),
    ("ADZUNA_API_KEY", "adzuna_api_key"),
    ("SUPABASE_URL", "supabase_url"),
    ("SUPABASE_KEY", "supabase_key"),
];

pub const DEFAULT_SEARCH_TERMS: &[&str] = &[
    "Business Analyst",
    "Product Analyst",
    "Product Operations",
    "Systems Analyst",
    "Business Operations",
    "IT Operations",
    "Business Process Analyst",
];

pub const DEFAULT_LOCATIONS: &[&str] = &["London", "Manchester", "Remote"];

/// Per-run configuration. Built once in `main` and handed to each stage.
///
/// Credentials default to empty strings: a missing key surfaces as an auth
/// error from the remote service, never as a local validation failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub adzuna_app_id: String,
    pub adzuna_api_key: String,
    pub adzuna_base_url: String,
    pub adzuna_country: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub results_per_page: u32,
    pub max_pages: u32,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub search_terms: Vec<String>,
    pub locations: Vec<String>,
    pub remote_region: String,
    pub platform: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            adzuna_app_id: String::new(),
            adzuna_api_key: String::new(),
            adzuna_base_url: "https://api.adzuna.com/v1/api/jobs".to_string(),
            adzuna_country: "gb".to_string(),
            supabase_url: String::new(),
            supabase_key: String::new(),
            results_per_page: 20,
            max_pages: 1,
            request_delay_ms: 1000,
            request_timeout_secs: 30,
            upload_timeout_secs: 30,
            search_terms: DEFAULT_SEARCH_TERMS.iter().map(|s| s.to_string()).collect(),
            locations: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            remote_region: "United Kingdom".to_string(),
            platform: "Adzuna".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `collector.toml` (optional), then `COLLECTOR_*`
    /// variables, then the four credential variables. A `.env` file in the
    /// working directory is loaded first if present.
    pub fn load() -> Result<Self> {
        if let Some(e) = dotenv_problem(dotenvy::dotenv()) {
            warn!(error = %e, "Ignoring unreadable .env file");
        }

        let env: Map<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let builder = Config::builder().add_source(File::with_name(SETTINGS_FILE).required(false));
        Self::layered(builder, env)
    }

    fn layered(builder: ConfigBuilder<DefaultState>, env: Map<String, String>) -> Result<Self> {
        let mut builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("search_terms")
                .with_list_parse_key("locations")
                .source(Some(env.clone())),
        );
        for (var, key) in CREDENTIAL_VARS {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }

        builder
            .build()
            .context("Failed to read collector settings")?
            .try_deserialize()
            .context("Invalid collector settings")
    }

    /// PostgREST endpoint of the snapshots table.
    pub fn sink_endpoint(&self) -> String {
        format!("{}/rest/v1/snapshots", self.supabase_url.trim_end_matches('/'))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

/// A missing `.env` is normal; anything else is worth a warning.
fn dotenv_problem(result: std::result::Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}
