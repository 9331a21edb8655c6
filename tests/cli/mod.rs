/// CLI tests that exercise the `migrun` binary through assert_cmd.
///
/// None of these need a running database: projects point at a port that
/// refuses connections, so any test that gets past the prompt fails with a
/// connection error instead.
pub mod error_handling;
pub mod seed_command;
