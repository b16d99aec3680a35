use axum::{
    routing::{get, post},
    Router,
};
use configuration::{DbSettings, ServerSettings};
use database::{CatalogStore, DbRepository};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod query;

pub use query::QueryRegistry;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub queries: QueryRegistry,
}

impl AppState {
    /// State with the default set of query types.
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog,
            queries: QueryRegistry::default(),
        }
    }
}

/// Builds the router with all routes and middleware attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::index))
        .route("/query", post(handlers::query))
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(server: ServerSettings, db: DbSettings) -> anyhow::Result<()> {
    let db_pool = database::connect(&db);
    let db_repo = DbRepository::new(db_pool);
    let state = AppState::new(Arc::new(db_repo));
    tracing::info!(query_types = ?state.queries.names(), "Registered query types.");
    let app = app(state);

    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
