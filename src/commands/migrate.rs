use crate::config::Config;
use crate::constants::{PRODUCTION_CONFIRMATION, PRODUCTION_ENVIRONMENT, SEED_COMMAND_NAME};
use crate::error::MigrateError;
use crate::migration::{MigrationOptions, Migrator, SqlMigrator};
use crate::prompts::{Confirmation, TerminalConfirmation};
use crate::seeder::{Seeder, SqlSeeder};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything one migrate invocation needs to decide what to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub environment: String,
    pub force: bool,
    pub step: bool,
    pub pretend: bool,
    pub seed: bool,
    /// Replaces the configured migration directory; relative to the working directory
    pub path: Option<String>,
}

impl ExecutionContext {
    pub fn options(&self) -> MigrationOptions {
        MigrationOptions {
            pretend: self.pretend,
            step: self.step,
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        requires_confirmation(&self.environment, self.force)
    }
}

/// Only an exact `prod` environment asks, and `--force` skips the question
pub fn requires_confirmation(environment: &str, force: bool) -> bool {
    environment == PRODUCTION_ENVIRONMENT && !force
}

/// Ask before touching a production database unless forced.
pub fn confirm_to_proceed(
    environment: &str,
    force: bool,
    confirmation: &dyn Confirmation,
) -> Result<(), MigrateError> {
    if !requires_confirmation(environment, force) {
        return Ok(());
    }

    let confirmed = confirmation
        .confirm(PRODUCTION_CONFIRMATION)
        .map_err(MigrateError::Prompt)?;

    if confirmed {
        Ok(())
    } else {
        Err(MigrateError::UserDeclined)
    }
}

/// The migrate command: confirmation gate, path resolution, run, optional
/// seeding and note output.
pub struct MigrateCommand<'a> {
    migrator: &'a mut dyn Migrator,
    confirmation: &'a dyn Confirmation,
    seeder: Option<&'a dyn Seeder>,
    default_path: PathBuf,
    working_dir: PathBuf,
}

impl<'a> MigrateCommand<'a> {
    pub fn new(
        migrator: &'a mut dyn Migrator,
        confirmation: &'a dyn Confirmation,
        default_path: PathBuf,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            migrator,
            confirmation,
            seeder: None,
            default_path,
            working_dir,
        }
    }

    pub fn with_seeder(mut self, seeder: &'a dyn Seeder) -> Self {
        self.seeder = Some(seeder);
        self
    }

    /// The default migration directory followed by the migrator's own paths.
    ///
    /// Duplicates are kept.
    pub fn resolve_paths(&self, context: &ExecutionContext) -> Vec<PathBuf> {
        let default_path = match &context.path {
            Some(path) => self.working_dir.join(path),
            None => self.default_path.clone(),
        };

        let mut paths = vec![default_path];
        paths.extend(self.migrator.paths());
        paths
    }

    pub async fn execute(
        &mut self,
        context: &ExecutionContext,
        out: &mut (dyn Write + Send),
    ) -> Result<(), MigrateError> {
        confirm_to_proceed(&context.environment, context.force, self.confirmation)?;

        let paths = self.resolve_paths(context);
        let options = context.options();
        info!(
            "Running migrations in {} environment ({} director{})",
            context.environment,
            paths.len(),
            if paths.len() == 1 { "y" } else { "ies" }
        );
        debug!("Migration paths: {:?}, options: {:?}", paths, options);

        self.migrator
            .run(&paths, options)
            .await
            .map_err(MigrateError::MigrationFailure)?;

        if context.seed {
            let seeder = self
                .seeder
                .ok_or_else(|| MigrateError::SeedCommandNotFound(SEED_COMMAND_NAME.to_string()))?;
            info!("Running {}", SEED_COMMAND_NAME);
            seeder.seed(out).await.map_err(MigrateError::SeedFailure)?;
        }

        for note in self.migrator.notes() {
            writeln!(out, "{}", note)?;
        }

        Ok(())
    }
}

pub async fn cmd_migrate(config: &Config, root_dir: &Path, context: ExecutionContext) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to determine working directory")?;

    let mut migrator = SqlMigrator::from_config(config, root_dir)?;
    let seeder = if context.seed {
        Some(SqlSeeder::from_config(config, root_dir)?)
    } else {
        None
    };

    let mut command = MigrateCommand::new(
        &mut migrator,
        &TerminalConfirmation,
        config.directories.migrations_path(root_dir),
        working_dir,
    );
    if let Some(seeder) = &seeder {
        command = command.with_seeder(seeder);
    }

    let mut stdout = std::io::stdout();
    command.execute(&context, &mut stdout).await?;
    Ok(())
}
