use thiserror::Error;

#[derive(Error, Debug)]
pub enum RteError {
    #[error("Dimension mismatch: {left} vs {right} components")]
    DimensionMismatch { left: usize, right: usize },

    #[error("No virtual strategy registered for property: {0}")]
    UnsupportedProperty(String),

    #[error("Invalid input signal: {0} (expected 0 or 1)")]
    InvalidInputSignal(i64),

    #[error("Actuator not found: {0}")]
    UnknownActuator(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RteError>;
