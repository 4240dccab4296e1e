use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("config parse error: {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config read error: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("env var invalid: {key}")]
    EnvInvalid {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}
