use crate::{
    error::AppError,
    query::{QueryOutcome, QueryRequest},
    AppState,
};
use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// # GET /
/// Reports that the service is up and lists its routes.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Course lookup server is running!",
        "routes": ["/query (POST)"],
    }))
}

/// # POST /query
/// Validates the body, dispatches on `query_type` and runs the lookup.
pub async fn query(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<QueryOutcome, AppError> {
    let request = QueryRequest::from_body(&body)?;
    tracing::debug!(query_type = %request.query_type, value = %request.value, "Handling query.");

    let handler = state
        .queries
        .get(&request.query_type)
        .ok_or_else(|| AppError::UnsupportedQueryType(request.query_type.clone()))?;

    handler.run(state.catalog.as_ref(), &request.value).await
}
