use crate::loader::DataLoaderOptions;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level extension manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub schema: SchemaConfig,

    #[serde(default)]
    pub loaders: LoadersConfig,
}

/// Schema resources contributed by the extension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Directory resource names are resolved against, relative to the manifest
    #[serde(default = "default_root")]
    pub root: String,

    /// Resource names, e.g. "/users.graphqls"
    pub resources: Vec<String>,
}

fn default_root() -> String {
    ".".to_string()
}

impl SchemaConfig {
    /// Validate schema configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resources.is_empty() {
            return Err("At least one schema resource must be listed".to_string());
        }

        if let Some(blank) = self.resources.iter().position(|r| r.trim().is_empty()) {
            return Err(format!("Schema resource #{} has an empty name", blank + 1));
        }

        Ok(())
    }
}

/// Options for data loaders instantiated per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadersConfig {
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Batch dispatch delay in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_cache")]
    pub cache: bool,
}

fn default_max_batch_size() -> usize {
    1000
}

fn default_delay_ms() -> u64 {
    1
}

fn default_cache() -> bool {
    true
}

impl Default for LoadersConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            delay_ms: default_delay_ms(),
            cache: default_cache(),
        }
    }
}

impl LoadersConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_batch_size == 0 {
            return Err("max_batch_size must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn options(&self) -> DataLoaderOptions {
        DataLoaderOptions {
            max_batch_size: self.max_batch_size,
            delay: Duration::from_millis(self.delay_ms),
            cache: self.cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(resources: &[&str]) -> SchemaConfig {
        SchemaConfig {
            root: default_root(),
            resources: resources.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_schema_validation_valid() {
        assert!(schema(&["/base.graphqls", "/users.graphqls"]).validate().is_ok());
    }

    #[test]
    fn test_schema_validation_no_resources() {
        assert!(schema(&[]).validate().is_err());
    }

    #[test]
    fn test_schema_validation_blank_resource() {
        let err = schema(&["/base.graphqls", " "]).validate().unwrap_err();
        assert!(err.contains("#2"));
    }

    #[test]
    fn test_loaders_validation() {
        let loaders = LoadersConfig {
            max_batch_size: 0,
            ..LoadersConfig::default()
        };
        assert!(loaders.validate().is_err());
        assert!(LoadersConfig::default().validate().is_ok());
    }

    #[test]
    fn test_loaders_options() {
        let loaders = LoadersConfig {
            max_batch_size: 50,
            delay_ms: 10,
            cache: false,
        };

        let options = loaders.options();
        assert_eq!(options.max_batch_size, 50);
        assert_eq!(options.delay, Duration::from_millis(10));
        assert!(!options.cache);
        assert_eq!(LoadersConfig::default().options(), DataLoaderOptions::default());
    }
}
