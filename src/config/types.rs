use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub environment: Option<String>,
    pub database: Option<DatabaseInput>,
    pub directories: Option<DirectoriesInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub environment: String,
    pub database: Database,
    pub directories: Directories,
}

// Database configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseInput {
    pub url: Option<String>,
    pub tracking_table: Option<TrackingTableInput>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackingTableInput {
    pub schema: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub tracking_table: TrackingTable,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingTable {
    pub schema: String,
    pub name: String,
}

// Directory configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoriesInput {
    pub migrations_dir: Option<String>,
    pub extra_migrations_dirs: Option<Vec<String>>,
    pub seeds_dir: Option<String>,
}

/// Directories as configured; relative entries are resolved by
/// [`Directories::resolve`] against the project root.
#[derive(Debug, Clone)]
pub struct Directories {
    pub migrations: String,
    pub extra_migrations: Vec<String>,
    pub seeds: String,
}

impl Directories {
    pub fn migrations_path(&self, root_dir: &std::path::Path) -> PathBuf {
        Self::resolve(root_dir, &self.migrations)
    }

    pub fn extra_migration_paths(&self, root_dir: &std::path::Path) -> Vec<PathBuf> {
        self.extra_migrations
            .iter()
            .map(|dir| Self::resolve(root_dir, dir))
            .collect()
    }

    pub fn seeds_path(&self, root_dir: &std::path::Path) -> PathBuf {
        Self::resolve(root_dir, &self.seeds)
    }

    fn resolve(root_dir: &std::path::Path, dir: &str) -> PathBuf {
        let path = PathBuf::from(dir);
        if path.is_absolute() {
            path
        } else {
            root_dir.join(path)
        }
    }
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct EnvironmentArgs {
    #[arg(long = "env", help = "Environment name (overrides the config file and APP_ENV)")]
    pub environment: Option<String>,

    #[arg(long, help = "Database URL (overrides the config file and DATABASE_URL)")]
    pub database_url: Option<String>,
}

impl From<EnvironmentArgs> for ConfigInput {
    fn from(args: EnvironmentArgs) -> Self {
        Self {
            environment: args.environment,
            database: args.database_url.map(|url| DatabaseInput {
                url: Some(url),
                tracking_table: None,
                acquire_timeout_secs: None,
            }),
            directories: None,
        }
    }
}
