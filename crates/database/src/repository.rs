use crate::DbError;
use async_trait::async_trait;
use sqlx::postgres::PgPool;

/// The catalog lookup. No ORDER BY: which row wins among several matches is
/// up to the database.
const FIND_COURSE_SQL: &str =
    r"SELECT description FROM cd106 WHERE LOWER(description) LIKE $1 ESCAPE '\' LIMIT 1";

/// Read access to the course catalog.
///
/// Handlers depend on this trait rather than on the pool, so tests can swap
/// in an in-memory catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the description of one course whose lower-cased description
    /// contains `needle`, or `None` when nothing matches.
    ///
    /// `needle` is expected to be lower-cased already.
    async fn find_course_description(&self, needle: &str) -> Result<Option<String>, DbError>;
}

/// Builds a `LIKE` pattern that matches `needle` as a literal substring.
pub fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// The `DbRepository` is the Postgres-backed `CatalogStore`.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for DbRepository {
    async fn find_course_description(&self, needle: &str) -> Result<Option<String>, DbError> {
        // The pool hands the connection back as soon as this call returns,
        // on success and on error alike.
        let description = sqlx::query_scalar::<_, String>(FIND_COURSE_SQL)
            .bind(like_contains_pattern(needle))
            .fetch_optional(&self.pool)
            .await?;

        tracing::debug!(needle, found = description.is_some(), "Course lookup finished.");
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_plain_needle_in_wildcards() {
        assert_eq!(like_contains_pattern("intro"), "%intro%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(like_contains_pattern("100%"), r"%100\%%");
        assert_eq!(like_contains_pattern("cs_101"), r"%cs\_101%");
        assert_eq!(like_contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn empty_needle_matches_everything() {
        assert_eq!(like_contains_pattern(""), "%%");
    }

    /// Runs the real statement against Postgres. Needs `TEST_DATABASE_URL`:
    /// `TEST_DATABASE_URL=postgres://... cargo test -p database -- --ignored`
    #[tokio::test]
    #[ignore = "needs a live Postgres in TEST_DATABASE_URL"]
    async fn lookup_matches_literal_case_insensitive_substrings() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        // One connection, so the temporary table is visible to every query.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        sqlx::query("CREATE TEMPORARY TABLE cd106 (description TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        for description in ["Introduction to Programming", "100% Rust", "CS1x01 Basics"] {
            sqlx::query("INSERT INTO cd106 (description) VALUES ($1)")
                .bind(description)
                .execute(&pool)
                .await
                .unwrap();
        }
        let repo = DbRepository::new(pool);

        assert_eq!(
            repo.find_course_description("intro").await.unwrap().as_deref(),
            Some("Introduction to Programming")
        );
        assert_eq!(
            repo.find_course_description("100%").await.unwrap().as_deref(),
            Some("100% Rust")
        );
        assert_eq!(repo.find_course_description("cs_101").await.unwrap(), None);
        assert_eq!(repo.find_course_description("zzz-nomatch").await.unwrap(), None);
    }

    #[test]
    fn lookup_is_capped_to_one_row() {
        assert!(FIND_COURSE_SQL.ends_with("LIMIT 1"));
        assert!(FIND_COURSE_SQL.contains("LOWER(description) LIKE $1"));
    }
}
