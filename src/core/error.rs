use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("No player agent in the arena")]
    NoPlayer,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown control command: {0:?}")]
    UnknownCommand(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
