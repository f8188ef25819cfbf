use clap::{Parser, Subcommand};

mod commands;
mod util;

use commands::banner::BannerCommands;
use commands::category::CategoryCommands;
use commands::imports::ImportCommands;
use commands::post::PostCommands;
use commands::privacy::PrivacyCommands;
use commands::tool::ToolCommands;
use commands::workflow::WorkflowCommands;

#[derive(Parser)]
#[command(
    name = "craly",
    version,
    about = "Craly admin CLI: catalog imports plus tool, category, workflow, post, banner and privacy policy management"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "CRALY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Show document counts per collection
    Stats,
    /// Bulk JSON import
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Manage tools
    Tool {
        #[command(subcommand)]
        command: ToolCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage workflows
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Manage banners
    Banner {
        #[command(subcommand)]
        command: BannerCommands,
    },
    /// Read or replace the privacy policy
    Privacy {
        #[command(subcommand)]
        command: PrivacyCommands,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Diagnostics go to stderr so stdout stays machine-readable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CRALY_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.trim_end_matches('/');

    let code = match cli.command {
        Commands::Health => commands::health::run(api_url).await,
        Commands::Stats => commands::stats::run(api_url).await,
        Commands::Import { command } => commands::imports::run(api_url, command).await,
        Commands::Tool { command } => commands::tool::run(api_url, command).await,
        Commands::Category { command } => commands::category::run(api_url, command).await,
        Commands::Workflow { command } => commands::workflow::run(api_url, command).await,
        Commands::Post { command } => commands::post::run(api_url, command).await,
        Commands::Banner { command } => commands::banner::run(api_url, command).await,
        Commands::Privacy { command } => commands::privacy::run(api_url, command).await,
    };

    std::process::exit(code);
}
