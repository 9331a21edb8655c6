use crate::config::Database;
use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    // Handle case where URL doesn't contain ://
    if !url.contains("://") {
        return url.to_string();
    }

    let parts: Vec<&str> = url.splitn(2, "://").collect();
    if parts.len() != 2 {
        return url.to_string();
    }

    let protocol = parts[0];
    let rest = parts[1];

    // User info ends at the last '@' before any query; passwords may contain '@'
    let before_query = rest.find(['?', '#']).unwrap_or(rest.len());
    if let Some(at_pos) = rest[..before_query].rfind('@') {
        let user_info = &rest[..at_pos];
        let host_and_path = &rest[at_pos + 1..];

        if let Some(colon_pos) = user_info.find(':') {
            let username = &user_info[..colon_pos];
            return format!("{}://{}:***@{}", protocol, username, host_and_path);
        }
    }

    url.to_string()
}

/// Build a pool that connects on first use.
///
/// Only the URL is validated here, so callers that may never touch the
/// database (a declined confirmation, for example) do not open a connection.
pub fn lazy_pool(database: &Database) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&database.url).with_context(|| {
        format!(
            "Invalid database URL: {}",
            mask_url_password(&database.url)
        )
    })?;

    debug!(
        "Database pool configured for {}",
        mask_url_password(&database.url)
    );

    Ok(PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .connect_lazy_with(options))
}
