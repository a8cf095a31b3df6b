mod types;

pub use types::{ExtensionConfig, LoadersConfig, SchemaConfig};

use crate::error::{ExtensionError, Result};
use crate::extension::SchemaExtensionConfiguration;
use crate::schema::SchemaParserBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an extension manifest from a TOML file
pub fn load_config(path: &str) -> Result<ExtensionConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| {
            ExtensionError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

    let config: ExtensionConfig = toml::from_str(&contents)?;
    validate(&config)?;

    Ok(config)
}

/// Save an extension manifest to a TOML file
pub fn save_config(config: &ExtensionConfig, path: &str) -> Result<()> {
    validate(config)?;

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)
        .map_err(|e| {
            ExtensionError::Config(format!("Failed to write config file '{}': {}", path, e))
        })?;

    Ok(())
}

fn validate(config: &ExtensionConfig) -> Result<()> {
    config.schema.validate().map_err(ExtensionError::Config)?;
    config.loaders.validate().map_err(ExtensionError::Config)?;
    Ok(())
}

/// Directory schema resources are read from, relative to the manifest location
pub fn resource_root(config: &ExtensionConfig, manifest_path: &str) -> PathBuf {
    let root = Path::new(&config.schema.root);
    if root.is_absolute() {
        return root.to_path_buf();
    }

    Path::new(manifest_path)
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(root)
}

/// Forward every schema resource listed in the manifest, in order
pub fn apply_schema_resources<B: SchemaParserBuilder>(
    config: &ExtensionConfig,
    root: &Path,
    extension: &mut SchemaExtensionConfiguration<B>,
) -> Result<()> {
    for resource in &config.schema.resources {
        tracing::info!("   Loading {} from {}", resource, root.display());
        extension.schema_resource(root, resource)?;
    }
    Ok(())
}
