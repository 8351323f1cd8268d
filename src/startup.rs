use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{
    health::ping,
    index::{index_page, index_post},
    users::{add_user, get_user, list_users},
};
use crate::services::user::UserService;
use crate::store::{UserRepository, UserStore, schema};

#[derive(Clone, Debug)]
pub struct AppState {
    pub user_service: UserService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            user_service: UserService::new(store),
        }
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/users", get(list_users).post(add_user))
        .route("/users/{id}", get(get_user))
        .route("/", get(index_page).post(index_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(configuration: Settings) -> anyhow::Result<()> {
    let pg_pool = get_connection_pool(&configuration.database);
    schema::create_all(&pg_pool).await?;

    let state = AppState::new(Arc::new(UserRepository::new(pg_pool)));
    let app = router(state);

    let address = configuration.application.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
