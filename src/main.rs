use std::sync::Arc;

use anyhow::Result;
use gistgrid::config::Config;
use gistgrid::database::Database;
use gistgrid::handlers::{router, AppState};
use gistgrid::remote::GistClient;
use gistgrid::session::Session;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

async fn setup(config: &Config) -> Result<AppState> {
    let db = Database::open(&config.database_path).await?;
    let remote = GistClient::new(config.api_base.as_str(), config.file_name.as_str())?;
    let session = Session::new(remote, db, config.columns);
    let gist_id = session.load_gist_id().await?;
    debug!("restored gist id {:?}", gist_id);
    Ok(AppState {
        session: Arc::new(session),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("could not listen for ctrl-c: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = setup(&config).await?;
    let router = router(state.clone());

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("open http://{} in a browser", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.session.save_gist_id().await?;
    debug!("saved gist id {:?}", state.session.gist_id());
    Ok(())
}
