//! Request parsing and query-type dispatch for `POST /query`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use database::CatalogStore;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A validated, normalized query request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query_type: String,
    pub value: String,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl QueryRequest {
    /// Parses a request body. Content-Type is not checked.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Err(AppError::InvalidRequest);
        };

        let (Some(Value::String(query_type)), Some(Value::String(value))) =
            (fields.remove("query_type"), fields.remove("value"))
        else {
            return Err(AppError::InvalidRequest);
        };

        let request = Self {
            query_type: normalize(&query_type),
            value: normalize(&value),
        };
        if request.value.is_empty() {
            return Err(AppError::InvalidRequest);
        }
        Ok(request)
    }
}

/// What a query handler produced for a valid request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Found { label: &'static str, value: String },
    NothingFound(String),
}

impl IntoResponse for QueryOutcome {
    fn into_response(self) -> Response {
        let (key, value) = match self {
            QueryOutcome::Found { label, value } => (label.to_string(), value),
            QueryOutcome::NothingFound(value) => ("Nothing_Found".to_string(), value),
        };
        let mut body = Map::new();
        body.insert(key, Value::String(value));
        Json(Value::Object(body)).into_response()
    }
}

/// One supported `query_type`.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    /// The normalized `query_type` this handler answers.
    fn name(&self) -> &'static str;

    async fn run(&self, catalog: &dyn CatalogStore, value: &str) -> Result<QueryOutcome, AppError>;
}

/// `query_type: "course"`, a substring search over course descriptions.
pub struct CourseQuery;

#[async_trait]
impl QueryHandler for CourseQuery {
    fn name(&self) -> &'static str {
        "course"
    }

    async fn run(&self, catalog: &dyn CatalogStore, value: &str) -> Result<QueryOutcome, AppError> {
        let outcome = match catalog.find_course_description(value).await? {
            Some(description) => QueryOutcome::Found {
                label: "COURSE",
                value: description,
            },
            None => QueryOutcome::NothingFound(value.to_string()),
        };
        Ok(outcome)
    }
}

/// Maps `query_type` names to their handlers.
#[derive(Clone)]
pub struct QueryRegistry {
    handlers: HashMap<&'static str, Arc<dyn QueryHandler>>,
}

impl QueryRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Adds a handler, replacing any previous one with the same name.
    pub fn register(mut self, handler: impl QueryHandler + 'static) -> Self {
        self.handlers.insert(handler.name(), Arc::new(handler));
        self
    }

    pub fn get(&self, query_type: &str) -> Option<&Arc<dyn QueryHandler>> {
        self.handlers.get(query_type)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for QueryRegistry {
    fn default() -> Self {
        Self::empty().register(CourseQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_both_fields() {
        let request =
            QueryRequest::from_body(br#"{"query_type":" Course ","value":"  Python  "}"#).unwrap();
        assert_eq!(request.query_type, "course");
        assert_eq!(request.value, "python");
    }

    #[test]
    fn normalization_is_idempotent() {
        let padded = QueryRequest::from_body(br#"{"query_type":"course","value":"  Python  "}"#).unwrap();
        let plain = QueryRequest::from_body(br#"{"query_type":"course","value":"python"}"#).unwrap();
        assert_eq!(padded, plain);
    }

    #[test]
    fn rejects_bodies_without_both_string_fields() {
        let bodies: [&[u8]; 10] = [
            b"",
            b"not json",
            b"[1, 2]",
            br#"["course", "intro"]"#,
            b"{}",
            br#"{"query_type":"course"}"#,
            br#"{"value":"intro"}"#,
            br#"{"query_type":"course","value":42}"#,
            br#"{"query_type":null,"value":"intro"}"#,
            br#"{"query_type":"course","value":"   "}"#,
        ];
        for body in bodies {
            assert!(
                matches!(QueryRequest::from_body(body), Err(AppError::InvalidRequest)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn empty_query_type_is_still_a_request() {
        let request = QueryRequest::from_body(br#"{"query_type":"","value":"x"}"#).unwrap();
        assert_eq!(request.query_type, "");
    }

    #[test]
    fn default_registry_knows_only_course() {
        let registry = QueryRegistry::default();
        assert_eq!(registry.names(), vec!["course"]);
        assert!(registry.get("student").is_none());
        assert!(registry.get("").is_none());
    }
}
