pub mod migrator;
pub mod parsing;
pub mod sql_migrator;

pub use migrator::{MigrationOptions, Migrator};
pub use parsing::{SqlFile, discover_migrations, discover_sql_files};
pub use sql_migrator::SqlMigrator;
