use std::time::Duration;

// Configuration file name
pub const CONFIG_FILENAME: &str = "migrun.yaml";

// Environment that requires confirmation before migrating
pub const PRODUCTION_ENVIRONMENT: &str = "prod";
pub const DEFAULT_ENVIRONMENT: &str = "dev";

pub const PRODUCTION_CONFIRMATION: &str =
    "Are you sure you want to execute the migrations in production?";

// Command names
pub const MIGRATE_COMMAND_NAME: &str = "eloquent:migrate";
pub const SEED_COMMAND_NAME: &str = "eloquent:seed";

// Migration and seed files
pub const SQL_EXTENSION: &str = "sql";

// Database pool
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
