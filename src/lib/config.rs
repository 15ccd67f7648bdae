use std::env;

use anyhow::Context;

use crate::transport::TlsConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_TODOS_PREFIX: &str = "/todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub todos_prefix: String,
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            todos_prefix: DEFAULT_TODOS_PREFIX.to_string(),
            tls: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment, after loading `.env` when one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            None => defaults.port,
        };
        let tls = match (lookup("TLS_CERT_PATH"), lookup("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            _ => None,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            todos_prefix: match lookup("TODOS_PREFIX") {
                Some(prefix) => check_prefix(prefix)
                    .context("TODOS_PREFIX must be a static path starting with '/'")?,
                None => defaults.todos_prefix,
            },
            tls,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Route prefixes go straight into the router, which panics on anything that
/// is not a plain absolute path.
fn check_prefix(prefix: String) -> anyhow::Result<String> {
    anyhow::ensure!(prefix.starts_with('/'), "got {prefix:?}, which does not start with '/'");
    anyhow::ensure!(
        !prefix.contains(['{', '}', '*']),
        "got {prefix:?}, which contains a route parameter or wildcard"
    );
    Ok(prefix)
}
