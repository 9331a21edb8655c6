use thiserror::Error;

/// Failures that end a migrate invocation.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The production confirmation was answered with anything but yes.
    #[error("migration cancelled by user")]
    UserDeclined,

    /// The migrator reported an error while running.
    #[error("{0:#}")]
    MigrationFailure(anyhow::Error),

    /// Seeding was requested but no seed command is available.
    #[error("command \"{0}\" is not defined")]
    SeedCommandNotFound(String),

    #[error("seeding failed: {0:#}")]
    SeedFailure(anyhow::Error),

    #[error("failed to read confirmation: {0:#}")]
    Prompt(anyhow::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
