use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use quiz_persistence::connection::connect_and_migrate;
use quiz_persistence::repositories::{PlayerRepository, RoundStateRepository, ScoreRepository};
use quiz_server::{
    admin::AdminService, config::Config, coordinator::SessionCoordinator, create_routes,
    sessions::SessionManager,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Scramble Live server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let session_manager = Arc::new(SessionManager::new());
    let players = PlayerRepository::new(db.clone());
    let scores = ScoreRepository::new(db.clone());
    let round_state = RoundStateRepository::new(db);

    let coordinator = Arc::new(SessionCoordinator::new(
        session_manager.clone(),
        players.clone(),
        scores.clone(),
        round_state.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(
        session_manager.clone(),
        players,
        scores,
        round_state,
        config.admin_pin.clone(),
    ));

    let routes = create_routes(session_manager.clone(), coordinator, admin_service);

    // Start cleanup task for idle sessions
    let cleanup_sessions = session_manager.clone();
    let idle_timeout = Duration::from_secs(config.session_idle_minutes * 60);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let pruned = cleanup_sessions.prune_stale(idle_timeout);
            if pruned > 0 {
                info!("pruned {} idle sessions", pruned);
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
