use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Failed to load schema resource '{name}': {source}")]
    Resource {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ExtensionError {
    fn from(err: toml::de::Error) -> Self {
        ExtensionError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for ExtensionError {
    fn from(err: toml::ser::Error) -> Self {
        ExtensionError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<async_graphql::dynamic::SchemaError> for ExtensionError {
    fn from(err: async_graphql::dynamic::SchemaError) -> Self {
        ExtensionError::SchemaGeneration(format!("Failed to build schema: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ExtensionError>;
