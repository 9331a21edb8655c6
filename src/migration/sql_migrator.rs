use crate::config::{Config, TrackingTable};
use crate::db::connection::{lazy_pool, mask_url_password};
use crate::db::error_context::describe_sql_error;
use crate::migration::migrator::{MigrationOptions, Migrator};
use crate::migration::parsing::{SqlFile, discover_migrations};
use crate::migration_tracking::{
    AppliedMigrations, checksum, ensure_tracking_table, load_applied_migrations, next_batch,
    record_migration, tracking_table_exists,
};
use anyhow::{Context, Result, bail};
use sqlx::{Executor, PgPool};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// A migration file that has not been applied yet, with its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMigration {
    pub file: SqlFile,
    pub sql: String,
    pub checksum: String,
}

/// Read every discovered file and keep the ones missing from the tracking table.
///
/// Fails when an applied migration's contents changed since it ran.
pub fn pending_migrations(
    files: Vec<SqlFile>,
    applied: &AppliedMigrations,
) -> Result<Vec<PendingMigration>> {
    let mut pending = Vec::new();

    for file in files {
        let sql = file.read()?;
        let checksum = checksum(&sql);

        if let Some(recorded) = applied.get(&file.name) {
            if recorded.checksum != checksum {
                bail!(
                    "Migration {} has been modified after being applied!\n\
                     Expected checksum: {}\n\
                     Actual checksum:   {}\n\n\
                     Migrations must be immutable once applied. Create a new migration with the changes instead.",
                    file.name,
                    recorded.checksum,
                    checksum
                );
            }
            debug!("Migration {} already applied, skipping", file.name);
            continue;
        }

        pending.push(PendingMigration {
            file,
            sql,
            checksum,
        });
    }

    Ok(pending)
}

/// Name the migrations this run already committed when a later one fails
pub fn with_committed_migrations(error: anyhow::Error, committed: &[&str]) -> anyhow::Error {
    if committed.is_empty() {
        return error;
    }
    error.context(format!(
        "Migrated before the failure: {}",
        committed.join(", ")
    ))
}

/// PostgreSQL-backed migrator running plain `.sql` files
pub struct SqlMigrator {
    pool: PgPool,
    display_url: String,
    tracking_table: TrackingTable,
    extra_paths: Vec<PathBuf>,
    notes: Vec<String>,
}

impl SqlMigrator {
    pub fn new(
        pool: PgPool,
        display_url: String,
        tracking_table: TrackingTable,
        extra_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            pool,
            display_url,
            tracking_table,
            extra_paths,
            notes: Vec::new(),
        }
    }

    /// Build a migrator from resolved configuration without connecting yet
    pub fn from_config(config: &Config, root_dir: &Path) -> Result<Self> {
        Ok(Self::new(
            lazy_pool(&config.database)?,
            mask_url_password(&config.database.url),
            config.database.tracking_table.clone(),
            config.directories.extra_migration_paths(root_dir),
        ))
    }

    async fn check_connection(&self) -> Result<()> {
        self.pool
            .acquire()
            .await
            .with_context(|| format!("Failed to connect to database at {}", self.display_url))?;
        Ok(())
    }

    async fn applied_migrations(&self, pretend: bool) -> Result<AppliedMigrations> {
        if pretend {
            // Pretend runs must not create anything
            if !tracking_table_exists(&self.pool, &self.tracking_table).await? {
                return Ok(AppliedMigrations::new());
            }
        } else {
            ensure_tracking_table(&self.pool, &self.tracking_table).await?;
        }

        load_applied_migrations(&self.pool, &self.tracking_table).await
    }

    async fn apply(&self, migration: &PendingMigration, batch: i32) -> Result<()> {
        let name = &migration.file.name;
        let start = Instant::now();

        let mut tx = self.pool.begin().await?;

        if let Err(e) = (&mut *tx).execute(migration.sql.as_str()).await {
            tx.rollback().await?;
            bail!("{}", describe_sql_error(&e, name, &migration.sql));
        }

        record_migration(&mut tx, &self.tracking_table, name, batch, &migration.checksum).await?;
        tx.commit()
            .await
            .with_context(|| format!("Failed to commit migration {}", name))?;

        debug!("Applied {} in batch {} ({:?})", name, batch, start.elapsed());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Migrator for SqlMigrator {
    fn paths(&self) -> Vec<PathBuf> {
        self.extra_paths.clone()
    }

    async fn run(&mut self, paths: &[PathBuf], options: MigrationOptions) -> Result<()> {
        self.notes.clear();

        let files = discover_migrations(paths)?;
        debug!("Found {} migration files", files.len());

        self.check_connection().await?;
        let applied = self.applied_migrations(options.pretend).await?;
        let pending = pending_migrations(files, &applied)?;

        if pending.is_empty() {
            self.notes.push("Nothing to migrate.".to_string());
            return Ok(());
        }

        if options.pretend {
            for migration in &pending {
                self.notes
                    .push(format!("{}: {}", migration.file.name, migration.sql.trim()));
            }
            return Ok(());
        }

        let mut batch = next_batch(&applied);
        let mut committed = Vec::new();
        for migration in &pending {
            info!("Migrating {}", migration.file.name);
            if let Err(e) = self.apply(migration, batch).await {
                return Err(with_committed_migrations(e, &committed));
            }
            committed.push(migration.file.name.as_str());
            self.notes.push(format!("Migrated: {}", migration.file.name));

            if options.step {
                batch += 1;
            }
        }

        Ok(())
    }

    fn notes(&self) -> &[String] {
        &self.notes
    }
}
