use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use schemagraph_core::{Error, Result};

/// Prefix of the environment variables read by [`ConnectionConfig::from_env`].
pub const ENV_PREFIX: &str = "VIS_MONDIAL_";

/// Explicit connection settings for the PostgreSQL statistics source.
///
/// A `url` is parsed first; any individual field that is set overrides the
/// matching part of it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub dbname: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sslmode: Option<String>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url.as_deref().map(mask_url_password))
            .field("user", &self.user)
            .field("dbname", &self.dbname)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Read `VIS_MONDIAL_{USER,DBNAME,PASSWORD,HOST,PORT,SSLMODE}`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source using the environment names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read("PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|err| {
                Error::Config(format!("{ENV_PREFIX}PORT={raw} is not a port: {err}"))
            })?),
            None => None,
        };

        Ok(Self {
            url: None,
            user: read("USER"),
            dbname: read("DBNAME"),
            password: read("PASSWORD"),
            host: read("HOST"),
            port,
            sslmode: read("SSLMODE"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let mut options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|err| Error::Config(format!("invalid connection url: {err}")))?,
            None => PgConnectOptions::new(),
        };

        if let Some(host) = &self.host {
            options = options.host(host);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(dbname) = &self.dbname {
            options = options.database(dbname);
        }
        if let Some(mode) = &self.sslmode {
            let mode = PgSslMode::from_str(mode)
                .map_err(|err| Error::Config(format!("invalid sslmode {mode}: {err}")))?;
            options = options.ssl_mode(mode);
        }

        Ok(options)
    }

    /// Connection metadata that is safe to log and persist.
    pub fn redacted(&self) -> Result<RedactedConnection> {
        let options = self.connect_options()?;
        let has_password = self.password.is_some()
            || self.url.as_deref().is_some_and(url_has_password);

        let user = options.get_username().to_string();
        let host = options.get_host().to_string();
        let port = options.get_port();
        let database = options.get_database().map(str::to_string);
        let ssl_mode = ssl_mode_name(options.get_ssl_mode()).to_string();

        let credentials = if has_password {
            format!("{user}:***")
        } else {
            user.clone()
        };
        let redacted = format!(
            "postgres://{credentials}@{host}:{port}/{}?sslmode={ssl_mode}",
            database.as_deref().unwrap_or("")
        );

        Ok(RedactedConnection {
            engine: "postgres".to_string(),
            user: Some(user),
            host: Some(host),
            port: Some(port),
            database,
            ssl_mode,
            redacted,
        })
    }
}

/// Connection metadata with secrets removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedConnection {
    pub engine: String,
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub ssl_mode: String,
    pub redacted: String,
}

fn ssl_mode_name(mode: PgSslMode) -> &'static str {
    match mode {
        PgSslMode::Disable => "disable",
        PgSslMode::Allow => "allow",
        PgSslMode::Prefer => "prefer",
        PgSslMode::Require => "require",
        PgSslMode::VerifyCa => "verify-ca",
        PgSslMode::VerifyFull => "verify-full",
    }
}

/// Userinfo of a URL, when it has one.
fn userinfo(url: &str) -> Option<(usize, &str)> {
    let start = url.find("://")? + 3;
    let rest = &url[start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let at = rest[..authority_end].rfind('@')?;
    Some((start, &rest[..at]))
}

fn url_has_password(url: &str) -> bool {
    userinfo(url).is_some_and(|(_, info)| info.contains(':'))
}

fn mask_url_password(url: &str) -> String {
    match userinfo(url) {
        Some((start, info)) => match info.find(':') {
            Some(colon) => {
                let mut masked = url.to_string();
                masked.replace_range(start + colon + 1..start + info.len(), "***");
                masked
            }
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}
