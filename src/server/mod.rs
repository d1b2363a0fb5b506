//! HTTP server exposing the document tree and the live-update WebSocket.

#[cfg(feature = "http-server")]
mod router;
#[cfg(feature = "http-server")]
mod ws;

#[cfg(feature = "http-server")]
pub use router::{AppState, serve};

#[cfg(not(feature = "http-server"))]
pub async fn serve(
    _settings: crate::Settings,
    _roots: Vec<std::path::PathBuf>,
    _watcher: crate::DocWatcher,
) -> anyhow::Result<()> {
    eprintln!("HTTP server support is not compiled in.");
    eprintln!("Please rebuild with: cargo build --features http-server");
    std::process::exit(1);
}
