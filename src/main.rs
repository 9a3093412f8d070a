use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use taskboard::config::Config;
use taskboard::db::Stores;
use taskboard::email::{LogMailer, Mailer, SystemMailer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting Taskboard");

    let stores = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied");

            Stores::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Using in-memory store; data is lost on exit");
            Stores::memory()
        }
    };

    let mailer: Arc<dyn Mailer> = match config.smtp.as_ref().map(SystemMailer::new) {
        Some(Ok(mailer)) => {
            tracing::info!("System SMTP configured");
            Arc::new(mailer)
        }
        Some(Err(e)) => {
            tracing::warn!("System SMTP not available: {e}");
            Arc::new(LogMailer)
        }
        None => Arc::new(LogMailer),
    };

    let addr = SocketAddr::new(config.host, config.port);
    let app = taskboard::build_app(stores, mailer, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
