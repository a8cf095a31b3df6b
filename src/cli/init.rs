use gqlext::config::{ExtensionConfig, LoadersConfig, SchemaConfig};
use gqlext::error::Result;
use std::fs;
use std::path::Path;

const EXAMPLE_SCHEMA: &str = r#""An author of posts"
type Author {
  id: ID!
  name: String!
}

"A published post"
type Post {
  id: ID!
  title: String!
  published: Date
  author: Author
}

scalar Date

type Query {
  post(id: ID!): Post
  posts(limit: Int = 20): [Post!]!
}
"#;

/// Run the init command to generate an example manifest
pub fn run(output: Option<String>) -> Result<()> {
    tracing::info!("🎨 Generating example extension...");

    let config = ExtensionConfig {
        schema: SchemaConfig {
            root: "schema".to_string(),
            resources: vec!["/posts.graphqls".to_string()],
        },
        loaders: LoadersConfig::default(),
    };

    match output {
        Some(dir) => {
            let dir = Path::new(&dir);
            fs::create_dir_all(dir.join("schema"))?;
            fs::write(dir.join("schema").join("posts.graphqls"), EXAMPLE_SCHEMA)?;

            let manifest = dir.join("gqlext.toml");
            gqlext::config::save_config(&config, &manifest.to_string_lossy())?;

            tracing::info!("📝 Generated example manifest: {}", manifest.display());
            tracing::info!("💡 Next step: gqlext check --config {}", manifest.display());
        }
        None => {
            let toml_string = toml::to_string_pretty(&config)?;
            println!("{}", toml_string);
            tracing::info!("💡 Tip: Add --output <dir> to write the manifest and schema files");
        }
    }

    Ok(())
}
