use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use brokerly_application::DEFAULT_MAX_PAGE_SIZE;
use brokerly_core::AppError;
use tracing_subscriber::EnvFilter;

/// Persistence adapter selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }

    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "STORE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub pending_page_size_max: u32,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let store_backend = env::var("STORE_BACKEND")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| StoreBackend::parse(value.as_str()))
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(required_non_empty_env("DATABASE_URL")?),
            StoreBackend::Memory => env::var("DATABASE_URL").ok(),
        };

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let database_max_connections = parsed_env("DATABASE_MAX_CONNECTIONS", 10_u32)?;
        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_owned(),
            ));
        }

        let pending_page_size_max = parsed_env("PENDING_PAGE_SIZE_MAX", DEFAULT_MAX_PAGE_SIZE)?;
        if pending_page_size_max == 0 {
            return Err(AppError::Validation(
                "PENDING_PAGE_SIZE_MAX must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            store_backend,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            pending_page_size_max,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
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

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::StoreBackend;

    #[test]
    fn store_backend_accepts_known_values() {
        assert_eq!(
            StoreBackend::parse(" Memory ").ok(),
            Some(StoreBackend::Memory)
        );
        assert_eq!(
            StoreBackend::parse("postgres").ok(),
            Some(StoreBackend::Postgres)
        );
    }

    #[test]
    fn store_backend_rejects_unknown_values() {
        let result = StoreBackend::parse("redis");
        assert!(result.is_err());
    }
}
