use thiserror::Error;

pub const DEFAULT_DB_PORT: u16 = 5432;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DB_PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// Settings for the identity service client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_pool_id: Option<String>,
    /// Overrides the region resolved by the AWS default provider chain.
    pub region: Option<String>,
}

/// Connection parameters for the relational data store.
///
/// Unset values are passed through to the driver, so a missing host or
/// database surfaces as a connect failure on the query route rather than at
/// start-up. Warm-up and delete invocations never need them.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: u16,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: None,
            database: None,
            user: None,
            password: None,
            port: DEFAULT_DB_PORT,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .finish()
    }
}

/// Process-wide configuration, read once at start-up and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match read("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            identity: IdentityConfig {
                user_pool_id: read("USER_POOL_ID"),
                region: read("COGNITO_REGION"),
            },
            store: StoreConfig {
                host: read("DB_HOST"),
                database: read("DB_NAME"),
                user: read("DB_USER"),
                password: read("DB_PASSWORD"),
                port,
            },
        })
    }
}
