use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";

/// Deployment environment the runner is pointed at.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub run: RunSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and `SHELF_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("SHELF")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("run.operations")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parse_environment(&environment)?;
        settings
            .run
            .params
            .validate()
            .with_context(|| "invalid [run.params] settings")?;

        Ok(settings)
    }
}

fn parse_environment(raw: &str) -> anyhow::Result<Environment> {
    match raw {
        "local" => Ok(Environment::Local),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        other => Err(anyhow!(
            "unsupported environment '{}'; expected local/staging/production",
            other
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_database")]
    pub database: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: Option<String>,
    /// Left to the driver default when unset.
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    #[serde(default)]
    pub server_selection_timeout_ms: Option<u64>,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_database() -> String {
        "plp_bookstore".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }

    fn default_app_name() -> Option<String> {
        Some("shelf".to_string())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            database: Self::default_database(),
            collection: Self::default_collection(),
            app_name: Self::default_app_name(),
            connect_timeout_ms: None,
            server_selection_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "TelemetrySettings::default_level")]
    pub level: String,
}

impl TelemetrySettings {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which operations run, and the arguments handed to the parameterised ones.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunSettings {
    /// Ordered operation names. Empty means the whole catalogue in registration order.
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default)]
    pub params: RunParams,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunParams {
    #[serde(default = "RunParams::default_year")]
    pub year: i32,
    #[serde(default = "RunParams::default_author")]
    pub author: String,
    #[serde(default = "RunParams::default_update_title")]
    pub update_title: String,
    #[serde(default = "RunParams::default_price")]
    pub price: f64,
    #[serde(default = "RunParams::default_delete_title")]
    pub delete_title: String,
    #[serde(default = "RunParams::default_sort_order")]
    pub sort_order: String,
    #[serde(default = "RunParams::default_page")]
    pub page: u64,
    #[serde(default = "RunParams::default_page_size")]
    pub page_size: u64,
}

impl RunParams {
    /// Pages are 1-indexed and never empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.page == 0 {
            return Err(anyhow!("page must be at least 1 (pages are 1-indexed)"));
        }
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be at least 1"));
        }
        Ok(())
    }

    fn default_year() -> i32 {
        1950
    }

    fn default_author() -> String {
        "George Orwell".to_string()
    }

    fn default_update_title() -> String {
        "1984".to_string()
    }

    fn default_price() -> f64 {
        12.99
    }

    fn default_delete_title() -> String {
        "Moby Dick".to_string()
    }

    fn default_sort_order() -> String {
        "asc".to_string()
    }

    fn default_page() -> u64 {
        1
    }

    fn default_page_size() -> u64 {
        5
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            year: Self::default_year(),
            author: Self::default_author(),
            update_title: Self::default_update_title(),
            price: Self::default_price(),
            delete_title: Self::default_delete_title(),
            sort_order: Self::default_sort_order(),
            page: Self::default_page(),
            page_size: Self::default_page_size(),
        }
    }
}
