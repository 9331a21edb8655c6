use crate::config::Config;
use crate::db::connection::{lazy_pool, mask_url_password};
use crate::db::error_context::describe_sql_error;
use crate::migration::parsing::discover_sql_files;
use anyhow::{Context, Result, bail};
use sqlx::{Connection, Executor, PgPool};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fills the database with data after migrations have run.
#[async_trait::async_trait]
pub trait Seeder: Send + Sync {
    /// Run the seed step, reporting progress to `out`.
    async fn seed(&self, out: &mut (dyn Write + Send)) -> Result<()>;
}

/// Runs every `.sql` file in the seeds directory, in filename order
pub struct SqlSeeder {
    pool: PgPool,
    display_url: String,
    seeds_dir: PathBuf,
}

impl SqlSeeder {
    pub fn new(pool: PgPool, display_url: String, seeds_dir: PathBuf) -> Self {
        Self {
            pool,
            display_url,
            seeds_dir,
        }
    }

    pub fn from_config(config: &Config, root_dir: &Path) -> Result<Self> {
        Ok(Self::new(
            lazy_pool(&config.database)?,
            mask_url_password(&config.database.url),
            config.directories.seeds_path(root_dir),
        ))
    }
}

#[async_trait::async_trait]
impl Seeder for SqlSeeder {
    async fn seed(&self, out: &mut (dyn Write + Send)) -> Result<()> {
        let files = discover_sql_files(&self.seeds_dir)?;

        if files.is_empty() {
            writeln!(out, "Nothing to seed.")?;
            return Ok(());
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .with_context(|| format!("Failed to connect to database at {}", self.display_url))?;

        for file in files {
            let sql = file.read()?;
            info!("Seeding {}", file.name);

            let mut tx = conn.begin().await?;
            if let Err(e) = (&mut *tx).execute(sql.as_str()).await {
                tx.rollback().await?;
                bail!("{}", describe_sql_error(&e, &file.name, &sql));
            }
            tx.commit()
                .await
                .with_context(|| format!("Failed to commit seed {}", file.name))?;

            writeln!(out, "Seeded: {}", file.name)?;
        }

        Ok(())
    }
}
