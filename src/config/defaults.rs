use crate::config::types::*;
use crate::constants::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_ENVIRONMENT};

// Config derives Default; its environment is filled in by the builder

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/migrun_dev".to_string(),
            tracking_table: TrackingTable::default(),
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
        }
    }
}

impl Default for TrackingTable {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            name: "migrations".to_string(),
        }
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            migrations: "migrations".to_string(),
            extra_migrations: vec![],
            seeds: "seeds".to_string(),
        }
    }
}

pub fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}
