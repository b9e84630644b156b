use registry_search_api::{
    api::{build_router, AppState},
    config::Config,
    search::{SearchService, SolrClient},
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "registry_search_api={},tower_http={}",
            config.observability.log_level, config.observability.log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting registry search API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Solr transport
    let solr = SolrClient::new(&config.solr)?;
    tracing::info!(
        base_url = %config.solr.base_url,
        core = %config.solr.core,
        "Solr client initialized"
    );

    let search = Arc::new(SearchService::new(Arc::new(solr), config.search.clone()));
    let app_state = AppState::new(search)
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs));

    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!(
        "   Search API: http://{}{}",
        http_addr,
        registry_search_api::api::SEARCH_PREFIX
    );

    axum::serve(http_listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
