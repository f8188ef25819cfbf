use clap::Subcommand;

use super::catalog::{self, PayloadArgs};

const RESOURCE: &str = "posts";

#[derive(Subcommand)]
pub enum PostCommands {
    /// List posts, newest first
    List,
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a post stamped with the current time
    Create(PayloadArgs),
    /// Edit a post (timestamp is kept)
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

pub async fn run(api_url: &str, command: PostCommands) -> i32 {
    match command {
        PostCommands::List => catalog::list(api_url, RESOURCE, None).await,
        PostCommands::Get { id } => catalog::get(api_url, RESOURCE, &id).await,
        PostCommands::Create(payload) => catalog::create(api_url, RESOURCE, payload).await,
        PostCommands::Update { id, payload } => {
            catalog::update(api_url, RESOURCE, &id, payload).await
        }
        PostCommands::Delete { id } => catalog::delete(api_url, RESOURCE, &id).await,
    }
}
