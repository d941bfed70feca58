use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::storage::SqliteStore;

pub mod error;
pub mod extract;
pub mod routes;

pub use error::ApiError;

/// Server state
///
/// One connection behind a lock. SQLite admits a single writer per
/// database, so saves queue here instead of on the file lock.
pub struct AppState {
    pub store: Mutex<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self { store: Mutex::new(store) }
    }

    /// Run `f` against the store on the blocking pool.
    pub async fn with_store<T, F>(self: &Arc<Self>, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteStore) -> crate::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut store = state.store.blocking_lock();
            f(&mut *store)
        })
        .await?;
        Ok(outcome?)
    }
}

/// All HTTP routes, without CORS
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/athletes", get(routes::list_athletes))
        .route("/athlete", get(routes::get_athlete))
        .route("/countries", get(routes::list_countries))
        .route("/sports", get(routes::list_sports))
        .route("/saveAthlete", post(routes::save_athlete))
        .route("/deleteAthlete", post(routes::delete_athlete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser client. `*` allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

pub async fn start_server(addr: SocketAddr, store: SqliteStore, allowed_origins: &[String]) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(store));
    let app = router(state).layer(cors_layer(allowed_origins)?);

    tracing::info!("Starting server on {}", addr);
    tracing::debug!("Allowed origins: {:?}", allowed_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
