//! The `quizpool serve` command.
//!
//! Starts the two collaborating services: the notebook renderer over a
//! freshly materialized notebook directory, and the structure server that
//! delivers the quiz tree and the web assets.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizpool_core::compose::compose;
use quizpool_core::parser;
use quizpool_server::renderer::spawn_renderer;
use quizpool_server::{notebook, validate_web_dir};

pub async fn execute(
    quiz: PathBuf,
    webdir: PathBuf,
    host: String,
    port: u16,
    renderer_port: u16,
    seed: Option<u64>,
) -> Result<()> {
    let raw = parser::parse_quiz(&quiz)?;
    for warning in parser::validate_quiz(&raw) {
        tracing::warn!(
            node = warning.node.as_deref().unwrap_or("<quiz>"),
            "{}",
            warning.message
        );
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let root = compose(&raw, &mut rng)?;

    let web_dir = validate_web_dir(&webdir)?;

    let notebook_dir = tempfile::tempdir().context("failed to create notebook directory")?;
    notebook::write_notebook_tree(&root, notebook_dir.path())?;

    let mut renderer = spawn_renderer(notebook_dir.path(), renderer_port)?;

    eprintln!(
        "Serving {} exercises at http://{host}:{port}/ (renderer on port {renderer_port})",
        root.leaves().len()
    );

    tokio::select! {
        result = quizpool_server::serve(root, web_dir, &host, port) => result,
        status = renderer.wait() => {
            let status = status.context("failed to wait on the notebook renderer")?;
            anyhow::bail!("notebook renderer exited unexpectedly: {status}")
        }
    }
}
