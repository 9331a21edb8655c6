pub mod migrate;
pub mod seed;

// Re-export all command functions
pub use migrate::{ExecutionContext, MigrateCommand, cmd_migrate};
pub use seed::cmd_seed;
