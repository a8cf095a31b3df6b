use gqlext::config::{apply_schema_resources, load_config, resource_root};
use gqlext::error::Result;
use gqlext::{DynamicSchemaBuilder, SchemaExtensionConfiguration};
use std::fs;

/// Run the check command: build the schema from a manifest and emit its SDL
pub fn run(config_path: String, output: Option<String>) -> Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);

    let config = load_config(&config_path)?;
    let root = resource_root(&config, &config_path);

    tracing::info!(
        "🔧 Assembling {} schema resources...",
        config.schema.resources.len()
    );

    let mut extension = SchemaExtensionConfiguration::new(DynamicSchemaBuilder::new());
    apply_schema_resources(&config, &root, &mut extension)?;

    let schema = extension.schema_builder().finish()?;
    let options = config.loaders.options();

    tracing::info!("✅ Schema is valid");
    tracing::info!(
        "   Data loaders: max_batch_size={}, delay={:?}, cache={}",
        options.max_batch_size,
        options.delay,
        options.cache
    );

    let sdl = schema.sdl();
    match output {
        Some(path) => {
            fs::write(&path, sdl)?;
            tracing::info!("📝 Wrote schema to {}", path);
        }
        None => println!("{}", sdl),
    }

    Ok(())
}
