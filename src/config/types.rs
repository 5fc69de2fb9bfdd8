//! The configuration structs used to build the AppConfig, and their impls.
use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::AsRefStr;
use tracing::info;

use crate::config::{ConfigError, ConfigResult, API_KEY_VAR, GROUP_ID_VAR};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub provider_config: ProviderConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Everything needed to talk to the email-marketing provider.
/// The secrets are optional on purpose: a missing secret fails the request, not the startup.
#[derive(Deserialize, Clone, Debug)]
pub struct ProviderConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Borrowed, validated view of the provider secrets.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCredentials<'a> {
    pub api_key: &'a SecretString,
    pub group_id: &'a str,
}

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    /// Layers `base.toml`, `<environment>.toml` and `APP_` prefixed env variables
    /// (`__` separates nested keys, e.g. `APP_NET_CONFIG__APP_PORT`),
    /// then picks up the provider secrets from the process environment.
    pub fn load(config_dir: impl AsRef<Path>, environment: Environment) -> ConfigResult<Self> {
        let config_dir = config_dir.as_ref();
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut config: AppConfig = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        config.provider_config.merge_env_secrets();
        info!(
            "{:<12} - Loaded configuration for: {}",
            "load_config",
            environment.as_ref()
        );

        Ok(config)
    }
}

impl ProviderConfig {
    /// Overrides the secrets with `MAILERLITE_API_KEY` and `MAILERLITE_GROUP_ID` when they are set.
    pub fn merge_env_secrets(&mut self) {
        if let Ok(api_key) = std::env::var(API_KEY_VAR) {
            self.api_key = Some(SecretString::from(api_key));
        }
        if let Ok(group_id) = std::env::var(GROUP_ID_VAR) {
            self.group_id = Some(group_id);
        }
    }

    /// Returns both secrets, or the name of the first one that is missing or empty.
    pub fn credentials(&self) -> ConfigResult<ProviderCredentials<'_>> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or(ConfigError::MissingSetting(API_KEY_VAR))?;
        let group_id = self
            .group_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingSetting(GROUP_ID_VAR))?;

        Ok(ProviderCredentials { api_key, group_id })
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
