//! CLI entry and dispatch.

use anyhow::{Context, Result};
use chores_core::config::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "chores")]
#[command(version)]
#[command(about = "Household chore tracker client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend server URL (overrides config and CHORES_SERVER_URL)
    #[arg(long, value_name = "URL", global = true)]
    server: Option<String>,

    /// Log filter (e.g. "debug", "chores_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in via the backend's identity provider
    Login {
        /// Do not open a browser; print the login URL instead
        #[arg(long)]
        no_browser: bool,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show who is currently logged in
    Status,

    /// Manage households
    Household {
        #[command(subcommand)]
        command: HouseholdCommands,
    },

    /// Manage tasks within a household
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(clap::Subcommand)]
enum HouseholdCommands {
    /// List the households you belong to
    List,
    /// Create a new household
    Create {
        /// Household name
        name: String,
    },
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// Create a recurring task in a household
    Create {
        /// Household the task belongs to
        #[arg(long, value_name = "ID")]
        household: String,

        /// Task title
        #[arg(long)]
        title: String,

        /// Recurs every N units
        #[arg(long, default_value = "1")]
        interval: String,

        /// days, weeks or months
        #[arg(long, default_value = "weeks")]
        unit: String,
    },

    /// List the tasks of a household
    List {
        /// Household to list tasks for
        #[arg(long, value_name = "ID")]
        household: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = Config::load().context("load config")?;
    let server_url = config.resolve_server_url(cli.server.as_deref())?;
    tracing::debug!(%server_url, "resolved backend");

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(dispatch(cli.command, &server_url))
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn dispatch(command: Commands, server_url: &str) -> Result<()> {
    let app = commands::App::new(server_url);

    let result = match command {
        Commands::Login { no_browser } => commands::auth::login(&app, no_browser),
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Status => commands::auth::status(&app),
        Commands::Household { command } => match command {
            HouseholdCommands::List => commands::household::list(&app).await,
            HouseholdCommands::Create { name } => commands::household::create(&app, &name).await,
        },
        Commands::Task { command } => match command {
            TaskCommands::Create {
                household,
                title,
                interval,
                unit,
            } => commands::task::create(&app, &household, title, interval, &unit).await,
            TaskCommands::List { household } => commands::task::list(&app, &household).await,
        },
    };

    app.finish(result)
}
