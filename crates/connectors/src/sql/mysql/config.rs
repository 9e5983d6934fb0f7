use crate::sql::base::error::DbError;
use mysql_async::{Opts, OptsBuilder, SslOpts};
use serde::Deserialize;
use std::{fmt, time::Duration};
use tracing::warn;

fn default_port() -> u16 {
    3306
}

/// Options the driver handles itself and that have no meaning for a
/// read-only scan over the binary protocol.
const IGNORED_DRIVER_OPTIONS: &[&str] = &[
    "parseTime",
    "loc",
    "readTimeout",
    "writeTimeout",
    "allowAllFiles",
    "allowCleartextPasswords",
    "allowFallbackToPlaintext",
    "allowNativePasswords",
    "allowOldPasswords",
    "checkConnLiveness",
    "clientFoundRows",
    "columnsWithAlias",
    "connectionAttributes",
    "interpolateParams",
    "maxAllowedPacket",
    "multiStatements",
    "rejectReadOnly",
    "serverPubKey",
    "timeTruncate",
];

/// Everything needed to open a MySQL connection.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    pub username: String,
    pub password: String,
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    /// Free-form `key=value` options. `charset`, `collation`, `tls` and
    /// `timeout` configure the connection; other driver options are
    /// ignored; any remaining key is set as a session system variable.
    /// Anything that does not contain exactly one `=` is ignored.
    #[serde(default)]
    pub extra_options: Vec<String>,
}

/// Connection settings derived from the extra options.
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Statements run on every new connection.
    pub init: Vec<String>,
    pub ssl_opts: Option<SslOpts>,
    pub connect_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Rejects settings that could never open a connection.
    pub fn validate(&self) -> Result<(), DbError> {
        let required = [
            ("hostname", &self.hostname),
            ("username", &self.username),
            ("database", &self.database),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DbError::InvalidConfig(format!("{name} must not be empty")));
            }
        }
        if self.port == 0 {
            return Err(DbError::InvalidConfig("port must not be 0".into()));
        }
        self.driver_options().map(|_| ())
    }

    /// Well-formed `key=value` pairs, in the order given.
    pub fn parsed_options(&self) -> Vec<(String, String)> {
        self.extra_options
            .iter()
            .filter_map(|option| {
                let parts: Vec<&str> = option.split('=').collect();
                match parts.as_slice() {
                    [key, value] => Some((key.trim().to_string(), value.trim().to_string())),
                    _ => {
                        warn!("Ignoring malformed connection option '{}'", option);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn driver_options(&self) -> Result<DriverOptions, DbError> {
        let mut options = DriverOptions::default();
        let mut charset: Option<String> = None;
        let mut collation: Option<String> = None;
        let mut session = Vec::new();

        for (key, value) in self.parsed_options() {
            match key.as_str() {
                "charset" => {
                    // The driver accepts a fallback list; the first entry wins.
                    let first = value.split(',').next().unwrap_or_default().trim();
                    charset = Some(sql_name("charset", first)?.to_string());
                }
                "collation" => collation = Some(sql_name("collation", &value)?.to_string()),
                "tls" => options.ssl_opts = ssl_opts(&value)?,
                "timeout" => options.connect_timeout = Some(parse_duration(&value)?),
                key if IGNORED_DRIVER_OPTIONS.contains(&key) => {
                    warn!("Ignoring driver option '{}', it does not apply to this connector", key);
                }
                _ => session.push(session_statement(&key, &value)?),
            }
        }

        let charset = charset.or_else(|| {
            collation
                .as_deref()
                .map(|c| c.split('_').next().unwrap_or(c).to_string())
        });
        if let Some(charset) = charset {
            options.init.push(match &collation {
                Some(collation) => format!("SET NAMES {charset} COLLATE {collation}"),
                None => format!("SET NAMES {charset}"),
            });
        }
        options.init.extend(session);

        Ok(options)
    }

    pub fn opts(&self) -> Result<Opts, DbError> {
        Ok(self.build_opts(self.driver_options()?))
    }

    pub fn build_opts(&self, options: DriverOptions) -> Opts {
        OptsBuilder::default()
            .ip_or_hostname(self.hostname.clone())
            .tcp_port(self.port)
            .user(Some(self.username.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .ssl_opts(options.ssl_opts)
            .init(options.init)
            .into()
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> DbError {
    DbError::InvalidConfig(format!("option '{key}={value}': {reason}"))
}

fn sql_name<'a>(key: &str, value: &'a str) -> Result<&'a str, DbError> {
    let valid = !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(invalid(key, value, "expected a plain name"))
    }
}

fn session_statement(key: &str, value: &str) -> Result<String, DbError> {
    sql_name(key, key)?;
    if value.contains(';') {
        return Err(invalid(key, value, "value must not contain ';'"));
    }
    if value.is_empty() {
        return Err(invalid(key, value, "value must not be empty"));
    }
    Ok(format!("SET {key}={value}"))
}

fn ssl_opts(value: &str) -> Result<Option<SslOpts>, DbError> {
    match value {
        "true" => Ok(Some(SslOpts::default())),
        "skip-verify" => Ok(Some(
            SslOpts::default().with_danger_accept_invalid_certs(true),
        )),
        "false" => Ok(None),
        "preferred" => {
            warn!("tls=preferred is not supported, connecting without TLS");
            Ok(None)
        }
        _ => Err(invalid("tls", value, "expected true, false, skip-verify or preferred")),
    }
}

/// Parses durations such as `500ms`, `10s` or `1m30s`.
fn parse_duration(value: &str) -> Result<Duration, DbError> {
    let err = || invalid("timeout", value, "expected a duration such as 10s or 500ms");
    let mut rest = value.trim();
    if rest.is_empty() {
        return Err(err());
    }

    let mut millis: u64 = 0;
    while !rest.is_empty() {
        let split = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(err)?;
        let (digits, tail) = rest.split_at(split);
        let amount: u64 = digits.parse().map_err(|_| err())?;
        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let factor = match unit {
            "ms" => 1,
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            _ => return Err(err()),
        };
        millis = millis.saturating_add(amount.saturating_mul(factor));
        rest = tail;
    }

    Ok(Duration::from_millis(millis))
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("extra_options", &self.extra_options)
            .finish()
    }
}
