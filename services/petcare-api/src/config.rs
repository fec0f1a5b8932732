use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_DB_HOST: &str = "localhost:5432";
pub const DEFAULT_DB_NAME: &str = "pet-care";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_TIMEOUT_MS: u64 = 5_000;

// Service configuration sourced from environment variables, optionally
// overridden by a YAML file named in PETCARE_CONFIG.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

// Connection target pieces; a full URL wins over host/name.
#[derive(Debug, Clone)]
struct DocumentStoreTarget {
    url: Option<String>,
    host: Option<String>,
    name: Option<String>,
    user: Option<String>,
    password: Option<String>,
    max_connections: Option<u32>,
}

impl DocumentStoreTarget {
    fn from_env() -> Result<Self> {
        let max_connections = match std::env::var("PETCARE_DB_MAX_CONNECTIONS") {
            Ok(value) => Some(
                value
                    .parse::<u32>()
                    .with_context(|| "parse PETCARE_DB_MAX_CONNECTIONS")?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            url: std::env::var("PETCARE_DATABASE_URL").ok(),
            host: std::env::var("PETCARE_DB_HOST").ok(),
            name: std::env::var("PETCARE_DB_NAME").ok(),
            user: std::env::var("PETCARE_DB_USER").ok(),
            password: std::env::var("PETCARE_DB_PASSWORD").ok(),
            max_connections,
        })
    }

    // Each key set in the YAML file replaces only its own piece.
    fn overlay(self, yaml: ApiConfigOverride) -> Self {
        Self {
            url: yaml.database_url.or(self.url),
            host: yaml.db_host.or(self.host),
            name: yaml.db_name.or(self.name),
            user: yaml.db_user.or(self.user),
            password: yaml.db_password.or(self.password),
            max_connections: yaml.db_max_connections.or(self.max_connections),
        }
    }

    fn into_postgres(self) -> PostgresConfig {
        let url = self.url.unwrap_or_else(|| {
            let host = self.host.as_deref().unwrap_or(DEFAULT_DB_HOST);
            let name = self.name.as_deref().unwrap_or(DEFAULT_DB_NAME);
            let user = self.user.as_deref().unwrap_or(DEFAULT_DB_USER);
            match self.password.as_deref() {
                Some(password) => format!("postgres://{user}:{password}@{host}/{name}"),
                None => format!("postgres://{user}@{host}/{name}"),
            }
        });
        PostgresConfig {
            url,
            max_connections: self.max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            connect_timeout_ms: DEFAULT_DB_TIMEOUT_MS,
            acquire_timeout_ms: DEFAULT_DB_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiConfigOverride {
    bind_addr: Option<String>,
    port: Option<u16>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    database_url: Option<String>,
    db_host: Option<String>,
    db_name: Option<String>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_max_connections: Option<u32>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let mut bind_addr: SocketAddr = std::env::var("PETCARE_API_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse PETCARE_API_BIND")?;
        if let Ok(port) = std::env::var("PORT") {
            bind_addr.set_port(port.parse().with_context(|| "parse PORT")?);
        }
        let metrics_bind = std::env::var("PETCARE_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse PETCARE_METRICS_BIND")?;
        let storage = match std::env::var("PETCARE_STORAGE") {
            Ok(value) => value
                .parse::<StorageBackend>()
                .with_context(|| "parse PETCARE_STORAGE")?,
            Err(_) => StorageBackend::Memory,
        };
        let target = DocumentStoreTarget::from_env()?;
        Ok(Self::assemble(bind_addr, metrics_bind, storage, target))
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let config = Self::from_env()?;
        match std::env::var("PETCARE_CONFIG") {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("read PETCARE_CONFIG: {path}"))?;
                config.apply_yaml(&contents)
            }
            Err(_) => Ok(config),
        }
    }

    fn apply_yaml(mut self, contents: &str) -> Result<Self> {
        let mut override_cfg: ApiConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse petcare config yaml")?;
        if let Some(value) = override_cfg.bind_addr.take() {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(port) = override_cfg.port {
            self.bind_addr.set_port(port);
        }
        if let Some(value) = override_cfg.metrics_bind.take() {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(storage) = override_cfg.storage {
            self.storage = storage;
        }
        let target = DocumentStoreTarget::from_env()?.overlay(override_cfg);
        self.postgres = match self.storage {
            StorageBackend::Postgres => Some(target.into_postgres()),
            StorageBackend::Memory => None,
        };
        Ok(self)
    }

    fn assemble(
        bind_addr: SocketAddr,
        metrics_bind: SocketAddr,
        storage: StorageBackend,
        target: DocumentStoreTarget,
    ) -> Self {
        let postgres = match storage {
            StorageBackend::Postgres => Some(target.into_postgres()),
            StorageBackend::Memory => None,
        };
        Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
        }
    }
}
