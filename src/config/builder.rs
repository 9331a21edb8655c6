use crate::config::defaults::default_environment;
use crate::config::{merge::Merge, types::*};
use anyhow::{Result, anyhow};

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct ConfigBuilder {
    config_input: ConfigInput,
    env_lookup: EnvLookup,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
            env_lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    /// Replace the process environment as the fallback source for
    /// `APP_ENV` and `DATABASE_URL`.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            environment: self.resolve_environment()?,
            database: self.resolve_database(&defaults.database)?,
            directories: self.resolve_directories(&defaults.directories),
        })
    }

    fn resolve_environment(&self) -> Result<String> {
        let environment = self
            .config_input
            .environment
            .clone()
            .or_else(|| (self.env_lookup)("APP_ENV"))
            .unwrap_or_else(default_environment);

        let environment = environment.trim().to_string();
        if environment.is_empty() {
            return Err(anyhow!("Environment name cannot be empty"));
        }
        Ok(environment)
    }

    fn resolve_database(&self, defaults: &Database) -> Result<Database> {
        let db_input = self.config_input.database.as_ref();

        let url = db_input
            .and_then(|d| d.url.as_ref())
            .cloned()
            .or_else(|| (self.env_lookup)("DATABASE_URL"))
            .unwrap_or_else(|| defaults.url.clone());

        let tracking_table = db_input
            .and_then(|d| d.tracking_table.as_ref())
            .map(|t| TrackingTable {
                schema: t
                    .schema
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.tracking_table.schema.clone()),
                name: t
                    .name
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.tracking_table.name.clone()),
            })
            .unwrap_or_else(|| defaults.tracking_table.clone());

        let acquire_timeout_secs = db_input
            .and_then(|d| d.acquire_timeout_secs)
            .unwrap_or(defaults.acquire_timeout_secs);

        if acquire_timeout_secs == 0 {
            return Err(anyhow!(
                "database.acquire_timeout_secs must be greater than zero"
            ));
        }

        Ok(Database {
            url,
            tracking_table,
            acquire_timeout_secs,
        })
    }

    fn resolve_directories(&self, defaults: &Directories) -> Directories {
        let dir_input = self.config_input.directories.as_ref();

        Directories {
            migrations: dir_input
                .and_then(|d| d.migrations_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.migrations.clone()),
            extra_migrations: dir_input
                .and_then(|d| d.extra_migrations_dirs.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.extra_migrations.clone()),
            seeds: dir_input
                .and_then(|d| d.seeds_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.seeds.clone()),
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
