use clap::{Parser, Subcommand};
use gqlext::error::Result;

mod cli;

#[derive(Parser)]
#[command(name = "gqlext")]
#[command(version = "0.1.0")]
#[command(about = "Assemble GraphQL schema extensions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an example extension manifest and schema resource
    Init {
        /// Directory to write the example into (if not specified, prints the manifest to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Load every schema resource of a manifest, build the schema and print its SDL
    Check {
        /// Manifest file path
        #[arg(long, default_value = "gqlext.toml")]
        config: String,

        /// Write the merged SDL to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            cli::init::run(output)?;
        }
        Commands::Check { config, output } => {
            cli::check::run(config, output)?;
        }
    }

    Ok(())
}
