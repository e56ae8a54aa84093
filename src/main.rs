use faculty_portal::infrastructure::auth::JwtAuthService;
use faculty_portal::infrastructure::config::AppConfig;
use faculty_portal::infrastructure::db;
use faculty_portal::infrastructure::state::AppState;
use faculty_portal::presentation;

use dotenvy::dotenv;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env()?;
    run_with_signal(config).await
}

async fn run_with_signal(config: AppConfig) -> anyhow::Result<()> {
    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Ignore the error: tests may initialize tracing more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let (listener, app) = bootstrap(&config).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn bootstrap(
    config: &AppConfig,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = db::create_pool(&config.database_url, &config.db).await?;

    sqlx::migrate!().run(&pool).await?;

    let auth_service = Arc::new(JwtAuthService::from_settings(&config.jwt)?);
    let state = AppState::new(pool, auth_service);
    let app = presentation::router::app(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    Ok((listener, app))
}
