use std::path::{Path, PathBuf};

use axum::Router;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use particlefield::io::load_config;
use particlefield::site::{self, PageOptions};

/// Rebuild the demo page from the config file
fn rebuild(config: &Path, output: &Path, page: &PageOptions) -> anyhow::Result<()> {
    let config = load_config(Some(config))?;
    site::build(&config, output, page)?;
    Ok(())
}

/// Start the development server with live reload
pub async fn serve(config: &Path, output: &Path, port: u16, page: PageOptions) -> anyhow::Result<()> {
    rebuild(config, output, &page)?;
    tracing::info!("built initial page in {}", output.display());

    let (tx, mut rx) = mpsc::channel::<()>(1);

    let config_name = config.file_name().map(|name| name.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            let touches_config = event
                .paths
                .iter()
                .any(|path| path.file_name().map(|n| n.to_os_string()) == config_name);
            if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                let _ = tx.try_send(());
            }
        }
    })?;

    // Editors often replace the file, so watch its directory
    let watch_path = config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

    let config_for_rebuild = config.to_path_buf();
    let output_for_rebuild = output.to_path_buf();
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait a bit for rapid changes to settle
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            while rx.try_recv().is_ok() {}

            match rebuild(&config_for_rebuild, &output_for_rebuild, &page) {
                Ok(()) => tracing::info!("rebuilt page"),
                Err(e) => tracing::error!("error rebuilding: {e:#}"),
            }
        }
    });

    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the browser whenever the output directory changes
    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(output, RecursiveMode::Recursive)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(output))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("development server running at http://localhost:{port}");
    tracing::info!("watching {} for changes", config.display());

    // Keep watchers alive
    let _watcher = watcher;
    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}
