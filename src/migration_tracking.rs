use crate::config::types::TrackingTable;
use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

/// Safely format a schema-qualified table name for SQL queries
///
/// Identifiers are restricted to letters, digits, underscores and dollar
/// signs (starting with a letter or underscore) and are double-quoted.
pub fn format_tracking_table_name(tracking_table: &TrackingTable) -> Result<String> {
    fn is_valid_sql_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }

    if !is_valid_sql_identifier(&tracking_table.schema) {
        return Err(anyhow::anyhow!(
            "Invalid schema name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.schema
        ));
    }

    if !is_valid_sql_identifier(&tracking_table.name) {
        return Err(anyhow::anyhow!(
            "Invalid table name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.name
        ));
    }

    Ok(format!(
        r#""{}"."{}""#,
        tracking_table.schema, tracking_table.name
    ))
}

/// A migration recorded in the tracking table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub batch: i32,
    pub checksum: String,
}

/// Applied migrations keyed by migration name
pub type AppliedMigrations = HashMap<String, AppliedMigration>;

pub async fn ensure_tracking_table(pool: &PgPool, tracking_table: &TrackingTable) -> Result<()> {
    let table_name = format_tracking_table_name(tracking_table)?;

    sqlx::query(&format!(
        r#"CREATE SCHEMA IF NOT EXISTS "{}""#,
        tracking_table.schema
    ))
    .execute(pool)
    .await
    .with_context(|| format!("Failed to create schema {}", tracking_table.schema))?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            migration TEXT PRIMARY KEY,
            batch INTEGER NOT NULL,
            checksum TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .with_context(|| format!("Failed to create tracking table {}", table_name))?;

    Ok(())
}

pub async fn tracking_table_exists(pool: &PgPool, tracking_table: &TrackingTable) -> Result<bool> {
    let table_name = format_tracking_table_name(tracking_table)?;

    let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(&table_name)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to look up tracking table {}", table_name))?;

    Ok(exists)
}

pub async fn load_applied_migrations(
    pool: &PgPool,
    tracking_table: &TrackingTable,
) -> Result<AppliedMigrations> {
    let table_name = format_tracking_table_name(tracking_table)?;

    let rows: Vec<(String, i32, String)> = sqlx::query_as(&format!(
        "SELECT migration, batch, checksum FROM {}",
        table_name
    ))
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to read applied migrations from {}", table_name))?;

    Ok(rows
        .into_iter()
        .map(|(migration, batch, checksum)| (migration, AppliedMigration { batch, checksum }))
        .collect())
}

/// Batch number for the next run: one past the highest recorded batch
pub fn next_batch(applied: &AppliedMigrations) -> i32 {
    applied.values().map(|m| m.batch).max().unwrap_or(0) + 1
}

pub async fn record_migration(
    tx: &mut Transaction<'_, Postgres>,
    tracking_table: &TrackingTable,
    migration: &str,
    batch: i32,
    checksum: &str,
) -> Result<()> {
    let table_name = format_tracking_table_name(tracking_table)?;

    sqlx::query(&format!(
        "INSERT INTO {} (migration, batch, checksum) VALUES ($1, $2, $3)",
        table_name
    ))
    .bind(migration)
    .bind(batch)
    .bind(checksum)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to record migration {}", migration))?;

    Ok(())
}

/// Checksum stored alongside each applied migration
pub fn checksum(sql: &str) -> String {
    format!("{:x}", md5::compute(sql))
}
