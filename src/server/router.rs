//! Axum router and JSON API handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use super::ws;
use crate::config::Settings;
use crate::watcher::{DocWatcher, SubscriberHub};
use crate::{log_event, tree};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Canonicalized watched roots, fixed for the process lifetime.
    pub roots: Arc<Vec<PathBuf>>,
    /// Subscription hub of the document watcher.
    pub hub: Arc<SubscriberHub>,
    /// Recognized document extension, without the dot.
    pub extension: Arc<str>,
}

/// Run the server until ctrl-c, then close the watcher.
pub async fn serve(
    settings: Settings,
    roots: Vec<PathBuf>,
    mut watcher: DocWatcher,
) -> anyhow::Result<()> {
    let state = AppState {
        roots: Arc::new(roots),
        hub: watcher.hub(),
        extension: settings.watch.extension.clone().into(),
    };

    let router = Router::new()
        .route("/", get(index))
        .route("/api/tree", get(api_tree))
        .route("/api/file", get(api_file))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log_event!("server", "listening", "http://{addr}");

    let ct = CancellationToken::new();
    let shutdown_ct = ct.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log_event!("server", "shutdown signal received");
            shutdown_ct.cancel();
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await?;

    // Tears down OS registrations and closes every viewer mailbox
    watcher.close();
    log_event!("server", "stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

async fn api_tree(
    State(state): State<AppState>,
) -> Result<Json<Vec<tree::DocTree>>, (StatusCode, String)> {
    match tree::build_trees(&state.roots, &state.extension) {
        Ok(trees) => Ok(Json(trees)),
        Err(e) => {
            tracing::error!("[server] tree build failed: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[derive(Deserialize)]
struct FileQuery {
    path: PathBuf,
}

async fn api_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<tree::Document>, (StatusCode, String)> {
    let path = std::fs::canonicalize(&query.path)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid path".to_string()))?;

    if !is_within_roots(&path, &state.roots) {
        return Err((StatusCode::FORBIDDEN, "Access denied".to_string()));
    }

    match tree::render_document(&path) {
        Ok(doc) => Ok(Json(doc)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// A requested file must live under one of the watched roots.
fn is_within_roots(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}
