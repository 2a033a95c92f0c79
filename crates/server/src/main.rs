use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faregate_core::{
    config::DEV_SECRET, create_notifier, load_config, validate_config, Db, NotificationQueue,
    NotificationWorker, PaymentProcessor, PaymentStore, RandomGateway, RedisQueue,
    SqlitePaymentStore, SqliteTicketStore, SqliteUserStore, TicketStore, TokenGate, UserStore,
};

use faregate_server::api::create_router;
use faregate_server::state::AppState;

/// Buffer size for the notification channel.
const NOTIFY_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("FAREGATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    if config.auth.secret == DEV_SECRET {
        warn!("Using the development signing secret; set FAREGATE_AUTH_SECRET in production");
    }

    info!("Database path: {:?}", config.database.path);
    info!("Queue: {} (list '{}')", config.queue.url, config.queue.key);

    // Shared SQLite handle and stores
    let db = Db::open(&config.database.path).context("Failed to open database")?;
    let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(db.clone()));
    let tickets: Arc<dyn TicketStore> = Arc::new(SqliteTicketStore::new(db.clone()));
    let payments: Arc<dyn PaymentStore> = Arc::new(SqlitePaymentStore::new(db));
    info!("Stores initialized");

    // Authentication gate
    let auth = TokenGate::new(config.auth.secret.clone());

    // Notification queue. The pump and the worker each hold their own
    // connection: the worker's blocking pop must not starve producers.
    let pump_queue: Arc<dyn NotificationQueue> = Arc::new(
        RedisQueue::connect(&config.queue)
            .await
            .context("Failed to connect to notification queue")?,
    );
    let worker_queue: Arc<dyn NotificationQueue> = Arc::new(
        RedisQueue::connect(&config.queue)
            .await
            .context("Failed to connect to notification queue")?,
    );

    // Producer side: notifier handle + pump task
    let (notifier, pump) = create_notifier(pump_queue, NOTIFY_BUFFER_SIZE);
    let pump_handle = tokio::spawn(pump.run());

    // Consumer side: delivery worker with a bounded pop so it observes
    // shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = NotificationWorker::new(worker_queue, shutdown_rx)
        .with_pop_timeout(Duration::from_secs(config.queue.pop_timeout_secs));
    let worker_handle = tokio::spawn(worker.run());

    // Payment processor with the simulated settlement gateway
    let gateway = Arc::new(RandomGateway::new(config.gateway.success_rate));
    let processor = PaymentProcessor::new(
        Arc::clone(&tickets),
        Arc::clone(&payments),
        gateway,
        notifier.clone(),
    );

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        auth,
        users,
        tickets,
        payments,
        processor,
        notifier,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    // Stop the consumer loop
    let _ = shutdown_tx.send(true);
    let _ = worker_handle.await;
    info!("Notification worker stopped");

    // The router (and with it AppState and every Notifier clone) is
    // dropped once serve returns, so the pump's channel closes and it
    // drains the remaining events before exiting.
    let _ = pump_handle.await;
    info!("Notification pump stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
