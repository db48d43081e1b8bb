use valentine_link::config::ServerConfig;
use valentine_link::sessions;
use valentine_link::web::{AppState, app_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.listen_addr();

    eprintln!("💌 Valentine Link v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Composer: http://{}/", addr);
    eprintln!("   API: http://{}/api", addr);
    eprintln!("   Link shape: {}", config.link_shape);
    match &config.public_origin {
        Some(origin) => eprintln!("   Public origin: {}", origin),
        None => eprintln!("   Public origin: from request Host header"),
    }
    eprintln!(
        "   Sessions: idle after {}s, swept every {}s\n",
        config.session_idle_timeout.as_secs(),
        config.prune_interval.as_secs()
    );

    let prune_interval = config.prune_interval;
    let state = AppState::new(config);

    // Spawn idle-session sweeps
    let _composer_sweep = sessions::spawn_prune_task(state.composers.clone(), prune_interval);
    let _presentation_sweep =
        sessions::spawn_prune_task(state.presentations.clone(), prune_interval);

    let app = app_routes(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Valentine Link server started");
    axum::serve(listener, app).await?;

    Ok(())
}
