// ============================
// promptdesk-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordRequirements;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Maximum session age in seconds
    pub session_ttl_secs: u64,
    /// Interval between periodic session sweeps in seconds
    pub sweep_interval_secs: u64,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
    /// Model key served until a switch-model call
    pub default_model: String,
    /// Base URL of the OpenAI-compatible inference router
    pub inference_base_url: String,
    /// Inference API token; `HUGGINGFACE_API_TOKEN` is honored as a fallback
    pub hf_api_token: Option<String>,
    /// Accounts provisioned at startup
    pub seed_users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".parse().expect("valid default bind addr"),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24, // 24 hours
            sweep_interval_secs: 60 * 60,   // hourly
            password_requirements: PasswordRequirements::default(),
            default_model: "mistral".to_string(),
            inference_base_url: "https://router.huggingface.co/v1".to_string(),
            hf_api_token: None,
            seed_users: vec![
                SeedUser {
                    username: "demo".to_string(),
                    password: "demo123".to_string(),
                },
                SeedUser {
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                },
                SeedUser {
                    username: "user".to_string(),
                    password: "password".to_string(),
                },
            ],
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `config/default.toml`, then
    /// `PROMPTDESK_*` environment variables, later sources winning.
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Load settings with an explicit config file path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("PROMPTDESK_"))
            .extract()?;

        Ok(settings)
    }
}
