mod config;
mod edge;
mod routes;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Router(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env present but unreadable");
        }
    }

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = config::ServerConfig::from_env()?;
    let port = config.port;
    tracing::info!(
        secure_cookies = config.session.edge_secure,
        edge_max_age_secs = config.session.edge_max_age_secs,
        login_path = %config.session.login_path,
        "configuration loaded"
    );

    let app = routes::app(config).map_err(StartupError::Router)?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "wheelhouse listening");
    axum::serve(listener, app).await?;
    Ok(())
}
