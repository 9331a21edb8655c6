pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod migration;
pub mod migration_tracking;
pub mod prompts;
pub mod seeder;

pub use commands::{ExecutionContext, MigrateCommand};
pub use error::MigrateError;
pub use migration::{MigrationOptions, Migrator};
pub use prompts::Confirmation;
pub use seeder::Seeder;
