use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use authit_server::{config::Config, state::AppState, store::open_store};

/// `authit-ingest health` — liveness probe for container health checks.
///
/// Calls `GET http://localhost:$AUTHIT_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("AUTHIT_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("authit=info".parse()?),
        )
        .json()
        .init();

    // A missing DATABASE_URL stops the process here, never per request.
    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let store = open_store(&cfg).await?;
    let state = Arc::new(AppState::new(store, cfg.clone()));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = authit_server::app::build_app(state);

    info!(port = cfg.port, "AuthIt ingest listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
