use thiserror::Error;

#[derive(Error, Debug)]
pub enum QatraError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Engine is not running")]
    EngineStopped,

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, QatraError>;
