use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DB_PORT: u16 = 30875;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// How the database connection is protected in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    Disable,
    Prefer,
    /// TLS is mandatory, but the server certificate is not verified.
    #[default]
    Require,
    VerifyCa,
    VerifyFull,
}

impl FromStr for TransportSecurity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "prefer" => Ok(Self::Prefer),
            "require" | "ssl" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(ConfigError::ValidationError(format!(
                "unknown DB_SSL_MODE '{other}'"
            ))),
        }
    }
}

/// Everything needed to open the connection pool.
#[derive(Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub security: TransportSecurity,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// Hand-written so the password never ends up in a log line.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("database", &self.database)
            .field("security", &self.security)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// The raw, untyped view of the environment as the `config` crate sees it.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDbEnv {
    #[serde(alias = "HOST_URL")]
    host_url: Option<String>,
    #[serde(alias = "USERNAME")]
    username: Option<String>,
    #[serde(alias = "PASSWORD")]
    password: Option<String>,
    #[serde(alias = "PORT")]
    port: Option<String>,
    #[serde(alias = "DBNAME")]
    dbname: Option<String>,
    #[serde(alias = "DB_SSL_MODE")]
    db_ssl_mode: Option<String>,
    #[serde(alias = "DB_MAX_CONNECTIONS")]
    db_max_connections: Option<String>,
    #[serde(alias = "DB_ACQUIRE_TIMEOUT_SECS")]
    db_acquire_timeout_secs: Option<String>,
}

/// Treats unset and blank variables the same way.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{name} must be a number, got '{raw}'")))
}

impl TryFrom<RawDbEnv> for DbSettings {
    type Error = ConfigError;

    fn try_from(raw: RawDbEnv) -> Result<Self, Self::Error> {
        let host = present(raw.host_url);
        let username = present(raw.username);
        let password = present(raw.password);
        let database = present(raw.dbname);

        let missing: Vec<String> = [
            ("HOST_URL", host.is_none()),
            ("USERNAME", username.is_none()),
            ("PASSWORD", password.is_none()),
            ("DBNAME", database.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        let (Some(host), Some(username), Some(password), Some(database)) =
            (host, username, password, database)
        else {
            return Err(ConfigError::MissingVariables(missing));
        };

        let port = match present(raw.port) {
            Some(p) => parse_number::<u16>("PORT", &p)?,
            None => DEFAULT_DB_PORT,
        };
        if port == 0 {
            return Err(ConfigError::ValidationError("PORT must not be 0".to_string()));
        }

        let security = match present(raw.db_ssl_mode) {
            Some(mode) => mode.parse()?,
            None => TransportSecurity::default(),
        };

        let max_connections = match present(raw.db_max_connections) {
            Some(n) => parse_number::<u32>("DB_MAX_CONNECTIONS", &n)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let acquire_timeout = match present(raw.db_acquire_timeout_secs) {
            Some(secs) => Duration::from_secs(parse_number("DB_ACQUIRE_TIMEOUT_SECS", &secs)?),
            None => Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        };

        Ok(Self {
            host: host.trim().to_string(),
            port,
            username,
            password,
            database: database.trim().to_string(),
            security,
            max_connections,
            acquire_timeout,
        })
    }
}

/// Where the HTTP listener binds and where logs go.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ServerSettings {
    /// The interface to listen on.
    #[cfg_attr(feature = "clap", arg(long, default_value_t = ServerSettings::DEFAULT_HOST))]
    pub host: IpAddr,

    /// The TCP port to listen on.
    #[cfg_attr(feature = "clap", arg(long, default_value_t = ServerSettings::DEFAULT_PORT))]
    pub port: u16,

    /// Also write logs to daily-rotated files in this directory.
    #[cfg_attr(feature = "clap", arg(long))]
    pub log_dir: Option<PathBuf>,
}

impl ServerSettings {
    pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    pub const DEFAULT_PORT: u16 = 5000;

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST,
            port: Self::DEFAULT_PORT,
            log_dir: None,
        }
    }
}
