use crate::constants::SQL_EXTENSION;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A migration or seed file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFile {
    /// File stem, used as the migration name in the tracking table
    pub name: String,
    pub path: PathBuf,
}

impl SqlFile {
    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }
}

/// Find `*.sql` files directly inside `dir`, sorted by name.
///
/// A missing directory yields no files.
pub fn discover_sql_files(dir: &Path) -> Result<Vec<SqlFile>> {
    let mut files = Vec::new();

    if !dir.exists() {
        debug!("Directory {} does not exist, skipping", dir.display());
        return Ok(files);
    }

    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file()
            && path.extension().is_some_and(|ext| ext == SQL_EXTENSION)
            && let Some(name) = path.file_stem().and_then(|n| n.to_str())
        {
            files.push(SqlFile {
                name: name.to_string(),
                path,
            });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(files)
}

/// Collect migrations from every directory in `paths`, ordered by name.
///
/// When two directories contain a migration with the same name, the one in
/// the later directory wins.
pub fn discover_migrations(paths: &[PathBuf]) -> Result<Vec<SqlFile>> {
    let mut by_name = BTreeMap::new();

    for dir in paths {
        for file in discover_sql_files(dir)? {
            if let Some(previous) = by_name.insert(file.name.clone(), file) {
                debug!(
                    "Migration {} in {} is overridden by a later directory",
                    previous.name,
                    previous.path.display()
                );
            }
        }
    }

    Ok(by_name.into_values().collect())
}
