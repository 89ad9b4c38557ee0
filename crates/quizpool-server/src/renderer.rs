//! Notebook renderer process supervision.
//!
//! The exercises themselves run in an external voila process that serves
//! the materialized notebooks. The frames it renders must be embeddable
//! from the structure server's origin, hence the frame-ancestors header.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

/// Tornado settings passed through to voila so the notebook frames may be
/// embedded and submitted cross-origin.
const TORNADO_SETTINGS: &str = "{ 'headers': { 'Content-Security-Policy': \
     \"frame-ancestors 'self' *\" }, 'disable_check_xsrf': True }";

/// Spawn the renderer over a materialized notebook directory.
///
/// The child is killed when dropped, so the renderer never outlives the
/// serve command that started it.
pub fn spawn_renderer(notebook_dir: &Path, port: u16) -> Result<Child> {
    let child = Command::new("voila")
        .arg(notebook_dir)
        .arg("--no-browser")
        .arg(format!("--port={port}"))
        .arg("--Voila.ip=0.0.0.0")
        .arg(format!("--Voila.tornado_settings={TORNADO_SETTINGS}"))
        .kill_on_drop(true)
        .spawn()
        .context("failed to start the notebook renderer (is voila installed?)")?;

    tracing::info!(port, dir = %notebook_dir.display(), "notebook renderer started");
    Ok(child)
}
