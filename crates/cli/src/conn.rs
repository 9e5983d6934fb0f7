use crate::{commands::ConnectionArgs, error::CliError};
use connectors::sql::mysql::config::ConnectionConfig;

/// Resolves the connection settings, preferring a `--config` file over
/// individual flags.
pub async fn resolve(args: &ConnectionArgs) -> Result<ConnectionConfig, CliError> {
    if let Some(path) = &args.config {
        let source = tokio::fs::read_to_string(path).await?;
        let config = serde_json::from_str(&source)?;
        return Ok(config);
    }
    from_flags(args)
}

fn from_flags(args: &ConnectionArgs) -> Result<ConnectionConfig, CliError> {
    Ok(ConnectionConfig {
        username: args.user.clone().ok_or(CliError::MissingSetting("--user"))?,
        password: args.password.clone().unwrap_or_default(),
        hostname: args.host.clone(),
        port: args.port,
        database: args
            .database
            .clone()
            .ok_or(CliError::MissingSetting("--database"))?,
        extra_options: args.options.clone(),
    })
}

/// Splits `schema.table`; a bare name lives in `default_schema`.
pub fn parse_table_name(name: &str, default_schema: &str) -> Result<(String, String), CliError> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        [table] if !table.is_empty() => Ok((default_schema.to_string(), table.to_string())),
        [schema, table] if !schema.is_empty() && !table.is_empty() => {
            Ok((schema.to_string(), table.to_string()))
        }
        _ => Err(CliError::InvalidTable(name.to_string())),
    }
}
