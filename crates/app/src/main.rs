use std::error::Error;
use std::sync::Arc;

use quiz_api::config::{self, ArgsError, Config, Invocation};
use quiz_api::{AppState, create_router};
use quiz_core::{Clock, TracingLogger};
use storage::Storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_api=info,quiz_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    tracing::info!("shutting down");
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    config::prepare_sqlite_file(&config.db_url)?;
    let storage = Storage::sqlite(&config.db_url).await?;
    tracing::info!("database ready at {}", config.db_url);

    let logger = Arc::new(TracingLogger::new("quiz_service"));
    let state = Arc::new(AppState::new(Clock::default_clock(), &storage, logger));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let invocation = match Config::parse(std::env::args().skip(1), |key| std::env::var(key).ok()) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{err}");
            config::print_usage();
            std::process::exit(2);
        }
    };

    let config = match invocation {
        Invocation::Serve(config) => config,
        Invocation::Help => {
            config::print_usage();
            return;
        }
    };

    if let Err(err) = run(config).await {
        if err.downcast_ref::<ArgsError>().is_some() {
            config::print_usage();
        }
        tracing::error!("quiz-api failed: {err}");
        std::process::exit(1);
    }
}
