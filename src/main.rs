use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use specview::watcher::DocWatcher;
use specview::{Settings, logging, server};

/// Directories probed when no paths are given on the command line.
const AUTO_DETECT_DIRS: &[&str] = &["specs", ".specify"];

#[derive(Parser)]
#[command(name = "specview")]
#[command(about = "Serve directories of markdown documents as a live-updating tree")]
struct Cli {
    /// Directories of documents to serve (default: ./specs or ./.specify)
    paths: Vec<PathBuf>,

    /// Port to serve on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a configuration file (default: ./specview.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("cannot load config from {}", path.display()))?,
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        }),
    };

    logging::init_with_config(&settings.logging);

    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let roots = resolve_roots(&cli.paths)?;

    let watcher = DocWatcher::with_config(&roots, &settings.watch)
        .context("failed to create file watcher")?;

    println!(
        "specview running at http://{}:{}",
        settings.server.bind, settings.server.port
    );
    println!(
        "Watching {} director{}:",
        roots.len(),
        if roots.len() == 1 { "y" } else { "ies" }
    );
    for root in &roots {
        println!("  - {}", root.display());
    }
    println!("Press Ctrl+C to stop");

    server::serve(settings, roots, watcher).await
}

/// Canonicalize the given paths, or auto-detect conventional document
/// directories when none were given.
fn resolve_roots(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return paths
            .iter()
            .map(|p| {
                std::fs::canonicalize(p)
                    .with_context(|| format!("path does not exist: {}", p.display()))
            })
            .collect();
    }

    let mut roots = Vec::new();
    for candidate in AUTO_DETECT_DIRS {
        if let Ok(abs) = std::fs::canonicalize(candidate) {
            println!("Auto-detected document directory: {candidate}");
            roots.push(abs);
        }
    }

    if roots.is_empty() {
        eprintln!("Error: No document directory found");
        eprintln!();
        eprintln!("Usage: specview [path-to-document-directory...]");
        eprintln!();
        eprintln!("If no path is provided, specview will look for:");
        for candidate in AUTO_DETECT_DIRS {
            eprintln!("  - ./{candidate}");
        }
        eprintln!();
        eprintln!("Example: specview ./my-docs");
        eprintln!("Example (multiple): specview ./specs ./.specify");
        std::process::exit(1);
    }

    Ok(roots)
}
