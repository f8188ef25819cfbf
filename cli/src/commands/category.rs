use clap::Subcommand;

use super::catalog::{self, PayloadArgs};

const RESOURCE: &str = "categories";

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories ordered by name
    List {
        /// Filter on name or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one category, including its tool membership list
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a category (id derived from the name)
    Create(PayloadArgs),
    /// Edit name, icon, tool count, description or enabled flag
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a category (tools keep their reference)
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

pub async fn run(api_url: &str, command: CategoryCommands) -> i32 {
    match command {
        CategoryCommands::List { search } => catalog::list(api_url, RESOURCE, search).await,
        CategoryCommands::Get { id } => catalog::get(api_url, RESOURCE, &id).await,
        CategoryCommands::Create(payload) => catalog::create(api_url, RESOURCE, payload).await,
        CategoryCommands::Update { id, payload } => {
            catalog::update(api_url, RESOURCE, &id, payload).await
        }
        CategoryCommands::Delete { id } => catalog::delete(api_url, RESOURCE, &id).await,
        CategoryCommands::Toggle { id } => catalog::toggle(api_url, RESOURCE, &id).await,
    }
}
