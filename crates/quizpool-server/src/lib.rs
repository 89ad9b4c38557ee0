//! quizpool-server — Serves the quiz structure and the web assets.
//!
//! The composed tree is shared as `Arc<QuizState>` across async handlers;
//! all endpoints are stateless lookups against it.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | The single-page quiz view (`index.html`) |
//! | GET | `/structure` | The composed quiz tree as tagged JSON |
//! | GET | `/static/*` | Web assets |

pub mod notebook;
pub mod renderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use quizpool_core::model::Node;

/// Shared server state: the composed, immutable quiz tree.
pub struct QuizState {
    pub root: Node,
}

pub type AppState = Arc<QuizState>;

/// Build the router. CORS is permissive: the exercise frames are served
/// from the renderer process on a different port.
pub fn create_router(state: AppState, web_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(web_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(web_dir.join("static")))
        .route("/structure", get(handle_structure))
        .layer(cors)
        .with_state(state)
}

async fn handle_structure(State(state): State<AppState>) -> Json<Node> {
    Json(state.root.clone())
}

/// Check that a web directory has the files the quiz view needs.
///
/// The directory must contain an `index.html` and a `static/` folder.
pub fn validate_web_dir(dir: &Path) -> Result<PathBuf> {
    anyhow::ensure!(dir.is_dir(), "web directory not found: {}", dir.display());
    anyhow::ensure!(
        dir.join("index.html").is_file(),
        "no index.html in web directory: {}",
        dir.display()
    );
    anyhow::ensure!(
        dir.join("static").is_dir(),
        "no static/ folder in web directory: {}",
        dir.display()
    );
    Ok(dir.to_path_buf())
}

/// Run the structure server until the process is stopped.
pub async fn serve(root: Node, web_dir: PathBuf, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(QuizState { root });
    let app = create_router(state, &web_dir);

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    tracing::info!(host, port, "structure server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
