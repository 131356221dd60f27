use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use program_media::{
    config::Config,
    db::PgRepository,
    routes::create_router,
    storage::S3PostIssuer,
    utils::init_tracing,
    AppState, MediaUploadUrlResolver,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = program_media::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    let repository = Arc::new(PgRepository::new(pool));
    let issuer = Arc::new(S3PostIssuer::from_config(&config.storage)?);
    let media = MediaUploadUrlResolver::new(
        repository.clone(),
        repository.clone(),
        repository,
        issuer,
        config.storage.upload_settings(),
    );
    info!("Media uploads target: {:?}", media.settings());

    // Create shared state
    let state = AppState {
        config: config.clone(),
        media: Arc::new(media),
    };

    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
