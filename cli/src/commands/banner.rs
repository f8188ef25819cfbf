use clap::Subcommand;

use super::catalog::{self, PayloadArgs};

const RESOURCE: &str = "banners";

#[derive(Subcommand)]
pub enum BannerCommands {
    /// List banners by display order
    List {
        /// Filter on title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one banner
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a banner
    Create(PayloadArgs),
    /// Edit a banner
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a banner
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

pub async fn run(api_url: &str, command: BannerCommands) -> i32 {
    match command {
        BannerCommands::List { search } => catalog::list(api_url, RESOURCE, search).await,
        BannerCommands::Get { id } => catalog::get(api_url, RESOURCE, &id).await,
        BannerCommands::Create(payload) => catalog::create(api_url, RESOURCE, payload).await,
        BannerCommands::Update { id, payload } => {
            catalog::update(api_url, RESOURCE, &id, payload).await
        }
        BannerCommands::Delete { id } => catalog::delete(api_url, RESOURCE, &id).await,
        BannerCommands::Toggle { id } => catalog::toggle(api_url, RESOURCE, &id).await,
    }
}
