use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use buildcompare_backend::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server_addr = config.server_addr;
    tracing::info!(
        %server_addr,
        cache_ttl = ?config.cache_ttl,
        source_timeout = ?config.source_timeout,
        cache_max_entries = ?config.cache_max_entries,
        "starting price aggregation server"
    );

    let app_state = AppState::new(&config);
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("listening on {}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
