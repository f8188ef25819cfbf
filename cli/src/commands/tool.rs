use clap::Subcommand;

use super::catalog::{self, PayloadArgs};

const RESOURCE: &str = "tools";

#[derive(Subcommand)]
pub enum ToolCommands {
    /// List tools ordered by name
    List {
        /// Filter on name, category or short description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one tool
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a tool and add it to its category
    Create(PayloadArgs),
    /// Edit a tool; a changed category moves its membership
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a tool and drop it from its category
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Flip the enabled flag
    Toggle {
        #[arg(long)]
        id: String,
    },
}

pub async fn run(api_url: &str, command: ToolCommands) -> i32 {
    match command {
        ToolCommands::List { search } => catalog::list(api_url, RESOURCE, search).await,
        ToolCommands::Get { id } => catalog::get(api_url, RESOURCE, &id).await,
        ToolCommands::Create(payload) => catalog::create(api_url, RESOURCE, payload).await,
        ToolCommands::Update { id, payload } => {
            catalog::update(api_url, RESOURCE, &id, payload).await
        }
        ToolCommands::Delete { id } => catalog::delete(api_url, RESOURCE, &id).await,
        ToolCommands::Toggle { id } => catalog::toggle(api_url, RESOURCE, &id).await,
    }
}
