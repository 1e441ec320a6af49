use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use groundwork_application::BootstrapConfig;
use groundwork_core::AppError;
use groundwork_domain::Mode;
use tracing_subscriber::EnvFilter;

/// What the binary does after loading its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    /// Serve the HTTP API.
    Serve,
    /// Apply database migrations and exit.
    Migrate,
    /// Run the full bootstrap pipeline once and exit.
    Bootstrap,
}

impl ApiCommand {
    fn parse(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None | Some("serve") => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("bootstrap") => Ok(Self::Bootstrap),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'serve', 'migrate' or 'bootstrap'"
            ))),
        }
    }
}

/// Storage backing every bootstrap port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps; state is lost on exit.
    Memory,
    /// PostgreSQL reached through `database_url`.
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub storage: StorageBackend,
    pub api_host: String,
    pub api_port: u16,
    pub bootstrap_token: String,
    pub bootstrap: BootstrapConfig,
    pub bootstrap_on_start: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let command = ApiCommand::parse(env::args().nth(1).as_deref())?;

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        if command == ApiCommand::Migrate && storage == StorageBackend::Memory {
            return Err(AppError::Validation(
                "the migrate command requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let bootstrap_token = required_non_empty_env("BOOTSTRAP_TOKEN")?;
        let initial_mode = Mode::from_transport(
            env::var("BOOTSTRAP_MODE")
                .unwrap_or_else(|_| Mode::default().as_str().to_owned())
                .as_str(),
        );

        Ok(Self {
            command,
            storage,
            api_host,
            api_port,
            bootstrap_token,
            bootstrap: BootstrapConfig {
                allow_reinitialization: flag_env("BOOTSTRAP_ALLOW_REINIT")?,
                allow_reset: flag_env("BOOTSTRAP_ALLOW_RESET")?,
                initial_mode,
            },
            bootstrap_on_start: flag_env("BOOTSTRAP_ON_START")?,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn flag_env(name: &str) -> Result<bool, AppError> {
    match env::var(name) {
        Ok(value) => parse_flag(name, value.as_str()),
        Err(_) => Ok(false),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(AppError::Validation(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
