use anyhow::Result;
use std::path::PathBuf;

/// Flags forwarded from the command line to the migrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Report what would run without applying anything
    pub pretend: bool,
    /// Record each migration in its own batch
    pub step: bool,
}

/// The engine that applies migrations and tracks which have run.
#[async_trait::async_trait]
pub trait Migrator: Send + Sync {
    /// Migration directories known to the engine beyond the default one.
    fn paths(&self) -> Vec<PathBuf>;

    /// Run every pending migration found in `paths`.
    async fn run(&mut self, paths: &[PathBuf], options: MigrationOptions) -> Result<()>;

    /// Notes describing what the last run did, in order.
    fn notes(&self) -> &[String];
}
