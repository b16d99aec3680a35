use configuration::{DbSettings, TransportSecurity};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

fn ssl_mode(security: TransportSecurity) -> PgSslMode {
    match security {
        TransportSecurity::Disable => PgSslMode::Disable,
        TransportSecurity::Prefer => PgSslMode::Prefer,
        TransportSecurity::Require => PgSslMode::Require,
        TransportSecurity::VerifyCa => PgSslMode::VerifyCa,
        TransportSecurity::VerifyFull => PgSslMode::VerifyFull,
    }
}

/// Builds the connection options (the DSN) from the loaded settings.
pub fn connect_options(settings: &DbSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .password(&settings.password)
        .database(&settings.database)
        .ssl_mode(ssl_mode(settings.security))
}

/// Creates the process-wide connection pool.
///
/// The pool is lazy: no connection is opened here, so an unreachable database
/// shows up as an error on the first query rather than at startup. Must be
/// called from within a Tokio runtime.
pub fn connect(settings: &DbSettings) -> PgPool {
    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        security = ?settings.security,
        "Creating database connection pool."
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(connect_options(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> DbSettings {
        DbSettings {
            host: "db.example.com".to_string(),
            port: 30875,
            username: "assistant".to_string(),
            password: "s3cret".to_string(),
            database: "bludb".to_string(),
            security: TransportSecurity::Require,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn options_carry_the_settings() {
        let options = connect_options(&settings());

        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 30875);
        assert_eq!(options.get_username(), "assistant");
        assert_eq!(options.get_database(), Some("bludb"));
    }

    #[test]
    fn maps_every_security_mode() {
        assert!(matches!(ssl_mode(TransportSecurity::Disable), PgSslMode::Disable));
        assert!(matches!(ssl_mode(TransportSecurity::Require), PgSslMode::Require));
        assert!(matches!(ssl_mode(TransportSecurity::VerifyFull), PgSslMode::VerifyFull));
    }

    #[tokio::test]
    async fn pool_creation_does_not_touch_the_database() {
        let pool = connect(&settings());

        assert_eq!(pool.size(), 0);
        assert_eq!(pool.options().get_max_connections(), 4);
    }
}
