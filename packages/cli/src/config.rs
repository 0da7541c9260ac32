// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Port, CORS origin, and per-provider OAuth app registrations

use std::env;
use std::num::ParseIntError;

use thiserror::Error;

use hubgate_auth::{ProviderConfig, ProviderKind};
use hubgate_providers::default_config;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("No providers configured; set {0}")]
    NoProviders(String),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // Where the provider sends the browser back after consent
        let redirect_base = lookup("OAUTH_REDIRECT_BASE")
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let mut providers = Vec::new();
        for kind in ProviderKind::all() {
            let prefix = kind.to_string().to_uppercase();
            let client_id = lookup(&format!("{}_CLIENT_ID", prefix));
            let client_secret = lookup(&format!("{}_CLIENT_SECRET", prefix));
            match (client_id, client_secret) {
                (Some(id), Some(secret)) => {
                    let redirect_uri =
                        format!("{}/integrations/{}/callback", redirect_base, kind);
                    providers.push(default_config(kind, id, secret, redirect_uri));
                }
                _ => {
                    tracing::warn!(
                        "Skipping {}: {}_CLIENT_ID / {}_CLIENT_SECRET not set",
                        kind,
                        prefix,
                        prefix
                    );
                }
            }
        }

        if providers.is_empty() {
            let wanted = ProviderKind::all()
                .iter()
                .map(|k| format!("{}_CLIENT_ID", k.to_string().to_uppercase()))
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(ConfigError::NoProviders(wanted));
        }

        Ok(Config {
            port,
            cors_origin,
            providers,
        })
    }
}
