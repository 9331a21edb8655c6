//! The `migrun` binary against a real database.

use crate::helpers::cli::{CliTestHelper, PRODUCTION_PROMPT};
use crate::helpers::harness::with_test_db;
use anyhow::Result;
use predicates::prelude::*;

#[tokio::test]
async fn test_migrate_then_seed() -> Result<()> {
    with_test_db(async |db| {
        let helper = CliTestHelper::new();
        helper.init_project(&db.url)?;
        helper.write_migration(
            "2024_01_01_create_countries",
            "CREATE TABLE countries (code TEXT PRIMARY KEY);",
        )?;
        helper.write_seed(
            "countries",
            "INSERT INTO countries (code) VALUES ('NL'), ('BE');",
        )?;

        helper
            .command()
            .args(["eloquent:migrate", "--seed"])
            .assert()
            .success()
            .stdout(predicate::str::diff(
                "Seeded: countries\nMigrated: 2024_01_01_create_countries\n",
            ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(db.pool())
            .await?;
        assert_eq!(count, 2);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_confirmed_production_run_applies_migrations() -> Result<()> {
    with_test_db(async |db| {
        let helper = CliTestHelper::new();
        helper.init_project(&db.url)?;
        helper.write_migration("001_create_users", "CREATE TABLE users (id INT);")?;

        helper
            .command()
            .args(["migrate", "--env", "prod"])
            .write_stdin("yes\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(PRODUCTION_PROMPT))
            .stdout(predicate::str::contains("Migrated: 001_create_users"));

        assert!(db.table_exists("users").await);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_declined_production_run_changes_nothing() -> Result<()> {
    with_test_db(async |db| {
        let helper = CliTestHelper::new();
        helper.init_project(&db.url)?;
        helper.write_migration("001_create_users", "CREATE TABLE users (id INT);")?;

        helper
            .command()
            .args(["migrate", "--env", "prod"])
            .write_stdin("no\n")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Migrated").not());

        assert!(!db.table_exists("users").await);
        assert!(!db.table_exists("migrations").await);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_failed_migration_skips_seeding() -> Result<()> {
    with_test_db(async |db| {
        let helper = CliTestHelper::new();
        helper.init_project(&db.url)?;
        helper.write_migration("001_broken", "CREATE TABLE users (id INT;")?;
        helper.write_seed("users", "INSERT INTO users (id) VALUES (1);")?;

        helper
            .command()
            .args(["migrate", "--seed"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Seeded").not())
            .stderr(predicate::str::contains("001_broken failed"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_custom_tracking_table() -> Result<()> {
    with_test_db(async |db| {
        let helper = CliTestHelper::new();
        std::fs::write(
            helper.project_root.join("migrun.yaml"),
            format!(
                r#"database:
  url: {}
  tracking_table:
    schema: ops
    name: schema_history
"#,
                db.url
            ),
        )?;
        helper.write_migration("001_create_users", "CREATE TABLE users (id INT);")?;

        helper.command().args(["migrate"]).assert().success();

        let recorded: Vec<String> =
            sqlx::query_scalar(r#"SELECT migration FROM "ops"."schema_history""#)
                .fetch_all(db.pool())
                .await?;
        assert_eq!(recorded, vec!["001_create_users".to_string()]);
        assert!(!db.table_exists("migrations").await);
        Ok(())
    })
    .await
}
