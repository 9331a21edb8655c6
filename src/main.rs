use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use migrun::commands::{self, ExecutionContext};
use migrun::config::{self, ConfigBuilder};
use migrun::constants::{CONFIG_FILENAME, MIGRATE_COMMAND_NAME, SEED_COMMAND_NAME};
use migrun::error::MigrateError;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about = "Run database migrations and seeds", long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
struct MigrateArgs {
    /// Run without asking for confirmation in production
    #[arg(long)]
    force: bool,

    /// Migration directory to use instead of the configured one, relative to the current directory
    #[arg(long)]
    path: Option<String>,

    /// Record each migration in its own batch
    #[arg(long)]
    step: bool,

    /// Show the SQL that would run without applying it
    #[arg(long)]
    pretend: bool,

    /// Run the seed command after migrating
    #[arg(long)]
    seed: bool,

    #[command(flatten)]
    environment_args: config::EnvironmentArgs,
}

#[derive(Parser, Debug)]
struct SeedArgs {
    /// Run without asking for confirmation in production
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    environment_args: config::EnvironmentArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the database migrations
    #[command(name = MIGRATE_COMMAND_NAME, visible_alias = "migrate")]
    Migrate(MigrateArgs),

    /// Seed the database with records
    #[command(name = SEED_COMMAND_NAME, visible_alias = "seed")]
    Seed(SeedArgs),
}

impl Commands {
    /// Printed when the production confirmation is declined
    fn cancelled_message(&self) -> &'static str {
        match self {
            Commands::Migrate(_) => "Migration cancelled.",
            Commands::Seed(_) => "Seeding cancelled.",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    let cancelled_message = cli.command.cancelled_message();
    let result = tokio::select! {
        result = run_main(cli) => result,
        _ = wait_for_shutdown_signal() => {
            info!("Received shutdown signal, stopping");
            Err(anyhow!("Interrupted"))
        }
    };

    if let Err(e) = &result
        && let Some(MigrateError::UserDeclined) = e.downcast_ref::<MigrateError>()
    {
        println!("{}", cancelled_message);
        std::process::exit(1);
    }

    result
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    // stdout carries the prompt and migration notes
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    match cli.command {
        Commands::Migrate(args) => {
            let config = ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(args.environment_args.into())
                .resolve()?;

            let context = ExecutionContext {
                environment: config.environment.clone(),
                force: args.force,
                step: args.step,
                pretend: args.pretend,
                seed: args.seed,
                path: args.path,
            };

            info!("Running {}", MIGRATE_COMMAND_NAME);
            commands::cmd_migrate(&config, &root_dir, context).await
        }
        Commands::Seed(args) => {
            let config = ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(args.environment_args.into())
                .resolve()?;

            info!("Running {}", SEED_COMMAND_NAME);
            commands::cmd_seed(&config, &root_dir, args.force).await
        }
    }
}
