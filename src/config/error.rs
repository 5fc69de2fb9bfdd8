pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to build the 'Environment' from the provided string: {0}")]
    StringToEnvironmentFail(String),
    #[error("missing or empty setting: {0}")]
    MissingSetting(&'static str),

    #[error("figment error: {0}")]
    Figment(#[from] figment::Error),
}
