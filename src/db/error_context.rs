//! Readable messages for SQL files that fail to execute.

use sqlx::postgres::{PgDatabaseError, PgErrorPosition};

/// Describe a failed SQL file, pulling DETAIL/HINT and the failing line out
/// of PostgreSQL errors when they are available.
pub fn describe_sql_error(error: &sqlx::Error, file_name: &str, sql: &str) -> String {
    let Some(pg_error) = error
        .as_database_error()
        .and_then(|db_error| db_error.try_downcast_ref::<PgDatabaseError>())
    else {
        return format!("{} failed: {}", file_name, error);
    };

    let line = pg_error.position().map(|pos| match pos {
        PgErrorPosition::Original(p) => line_of(sql, p),
        PgErrorPosition::Internal { position, .. } => line_of(sql, position),
    });

    let mut message = match line {
        Some(line) => format!("{} failed at line {}: {}", file_name, line, pg_error.message()),
        None => format!("{} failed: {}", file_name, pg_error.message()),
    };

    if let Some(detail) = pg_error.detail() {
        message.push_str(&format!("\n  Detail: {}", detail));
    }
    if let Some(hint) = pg_error.hint() {
        message.push_str(&format!("\n  Hint: {}", hint));
    }
    if let Some(line) = line
        && let Some(text) = sql.lines().nth(line - 1)
    {
        message.push_str(&format!("\n  {:4} | {}", line, text));
    }

    message
}

/// Convert a 1-indexed character position into a 1-indexed line number
pub fn line_of(sql: &str, position: usize) -> usize {
    sql.chars()
        .take(position.saturating_sub(1))
        .filter(|c| *c == '\n')
        .count()
        + 1
}
