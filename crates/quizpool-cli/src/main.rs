//! quizpool CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizpool",
    version,
    about = "Hierarchical quiz server with live pass/fail scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a quiz: start the structure server and the notebook renderer
    Serve {
        /// Path to the TOML quiz definition
        quiz: PathBuf,

        /// Web assets directory (needs ./index.html and ./static/)
        #[arg(long, default_value = "web")]
        webdir: PathBuf,

        /// Structure server bind host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Structure server port
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Notebook renderer port
        #[arg(long, default_value = "8866")]
        renderer_port: u16,

        /// Seed for reproducible item selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check a quiz definition without serving it
    Validate {
        /// Path to the TOML quiz definition
        quiz: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizpool=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            quiz,
            webdir,
            host,
            port,
            renderer_port,
            seed,
        } => commands::serve::execute(quiz, webdir, host, port, renderer_port, seed).await,
        Commands::Validate { quiz } => commands::validate::execute(quiz),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
