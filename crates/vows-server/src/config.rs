//! Server configuration.
//!
//! Loaded from the TOML file named by `VOWS_CONFIG` (when set), then
//! overridden field by field from `VOWS_*` environment variables.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use vows_auth::AuthConfig;
use vows_db::DbConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("{0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DbConfig::default();
        Self {
            url: db.url,
            namespace: db.namespace,
            database: db.database,
            username: db.username,
            password: db.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Inline PEM; takes precedence over `jwt_private_key_file`.
    pub jwt_private_key: Option<String>,
    pub jwt_private_key_file: Option<String>,
    pub jwt_public_key: Option<String>,
    pub jwt_public_key_file: Option<String>,
    pub jwt_issuer: String,
    pub session_lifetime_secs: u64,
    pub provider_secret: Option<String>,
    pub admin_emails: Vec<String>,
}

impl Default for AuthSection {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            jwt_private_key: None,
            jwt_private_key_file: None,
            jwt_public_key: None,
            jwt_public_key_file: None,
            jwt_issuer: auth.jwt_issuer,
            session_lifetime_secs: auth.session_lifetime_secs,
            provider_secret: None,
            admin_emails: Vec::new(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Base URL used to build public RSVP links.
    pub public_base_url: String,
    /// Planner event channel capacity.
    pub event_capacity: usize,
    pub database: DatabaseSection,
    pub auth: AuthSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            public_base_url: "http://localhost:8080".into(),
            event_capacity: 256,
            database: DatabaseSection::default(),
            auth: AuthSection::default(),
        }
    }
}

fn read(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

impl ServerConfig {
    /// Load from `VOWS_CONFIG` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("VOWS_CONFIG") {
            Ok(path) => Self::from_toml(&read(&path)?)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Override fields from `VOWS_*` variables looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("VOWS_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = var("VOWS_PUBLIC_BASE_URL") {
            self.public_base_url = v;
        }
        if let Some(v) = var("VOWS_EVENT_CAPACITY") {
            self.event_capacity = parse_env("VOWS_EVENT_CAPACITY", v)?;
        }

        let db = &mut self.database;
        for (key, slot) in [
            ("VOWS_DB_URL", &mut db.url),
            ("VOWS_DB_NAMESPACE", &mut db.namespace),
            ("VOWS_DB_DATABASE", &mut db.database),
            ("VOWS_DB_USERNAME", &mut db.username),
            ("VOWS_DB_PASSWORD", &mut db.password),
        ] {
            if let Some(v) = var(key) {
                *slot = v;
            }
        }

        let auth = &mut self.auth;
        if let Some(v) = var("VOWS_JWT_PRIVATE_KEY") {
            auth.jwt_private_key = Some(v);
        }
        if let Some(v) = var("VOWS_JWT_PUBLIC_KEY") {
            auth.jwt_public_key = Some(v);
        }
        if let Some(v) = var("VOWS_JWT_ISSUER") {
            auth.jwt_issuer = v;
        }
        if let Some(v) = var("VOWS_SESSION_LIFETIME_SECS") {
            auth.session_lifetime_secs = parse_env("VOWS_SESSION_LIFETIME_SECS", v)?;
        }
        if let Some(v) = var("VOWS_PROVIDER_SECRET") {
            auth.provider_secret = Some(v);
        }
        if let Some(v) = var("VOWS_ADMIN_EMAILS") {
            auth.admin_emails = v
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    pub fn db_config(&self) -> DbConfig {
        let db = &self.database;
        DbConfig {
            url: db.url.clone(),
            namespace: db.namespace.clone(),
            database: db.database.clone(),
            username: db.username.clone(),
            password: db.password.clone(),
        }
    }

    /// Resolve key material (inline or from files) into an [`AuthConfig`].
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let auth = &self.auth;
        let private_key = match (&auth.jwt_private_key, &auth.jwt_private_key_file) {
            (Some(pem), _) => pem.clone(),
            (None, Some(path)) => read(path)?,
            (None, None) => return Err(ConfigError::Missing("a JWT private key is required")),
        };
        let public_key = match (&auth.jwt_public_key, &auth.jwt_public_key_file) {
            (Some(pem), _) => pem.clone(),
            (None, Some(path)) => read(path)?,
            (None, None) => return Err(ConfigError::Missing("a JWT public key is required")),
        };

        Ok(AuthConfig {
            jwt_private_key_pem: private_key,
            jwt_public_key_pem: public_key,
            session_lifetime_secs: auth.session_lifetime_secs,
            jwt_issuer: auth.jwt_issuer.clone(),
            provider_secret: auth.provider_secret.clone(),
            admin_emails: auth.admin_emails.clone(),
        })
    }
}
