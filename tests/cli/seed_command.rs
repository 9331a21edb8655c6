use crate::helpers::cli::{CliTestHelper, PRODUCTION_PROMPT, UNREACHABLE_DATABASE_URL};
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_seed_without_seed_files_does_not_connect() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.init_project(UNREACHABLE_DATABASE_URL)?;

    helper
        .command()
        .args(["eloquent:seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to seed."));

    Ok(())
}

#[test]
fn test_seed_asks_for_confirmation_in_prod() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.init_project(UNREACHABLE_DATABASE_URL)?;

    helper
        .command()
        .args(["seed", "--env", "prod"])
        .write_stdin("no\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(PRODUCTION_PROMPT))
        .stdout(predicate::str::contains("Seeding cancelled."))
        .stdout(predicate::str::contains("Migration cancelled.").not())
        .stdout(predicate::str::contains("Nothing to seed.").not());

    Ok(())
}

#[test]
fn test_seed_with_files_reaches_the_database() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.init_project(UNREACHABLE_DATABASE_URL)?;
    helper.write_seed("countries", "INSERT INTO countries (code) VALUES ('NL');")?;

    helper
        .command()
        .args(["eloquent:seed", "--env", "prod", "--force"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(PRODUCTION_PROMPT).not())
        .stderr(predicate::str::contains("Failed to connect to database"));

    Ok(())
}
