use crate::commands::migrate::confirm_to_proceed;
use crate::config::Config;
use crate::prompts::{Confirmation, TerminalConfirmation};
use crate::seeder::{Seeder, SqlSeeder};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Seed the database, asking first when running against production.
pub async fn run_seed(
    seeder: &dyn Seeder,
    confirmation: &dyn Confirmation,
    environment: &str,
    force: bool,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    confirm_to_proceed(environment, force, confirmation)?;

    info!("Seeding database in {} environment", environment);
    seeder.seed(out).await
}

pub async fn cmd_seed(config: &Config, root_dir: &Path, force: bool) -> Result<()> {
    let seeder = SqlSeeder::from_config(config, root_dir)?;
    let mut stdout = std::io::stdout();

    run_seed(
        &seeder,
        &TerminalConfirmation,
        &config.environment,
        force,
        &mut stdout,
    )
    .await
}
