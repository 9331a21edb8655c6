// Integration tests for migrun

pub mod cli;
pub mod helpers;
