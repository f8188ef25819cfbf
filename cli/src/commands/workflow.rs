use clap::Subcommand;

use super::catalog::{self, PayloadArgs};

const RESOURCE: &str = "workflows";

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// List workflows ordered by name
    List,
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a workflow; steps is taken from the journey length
    Create(PayloadArgs),
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

pub async fn run(api_url: &str, command: WorkflowCommands) -> i32 {
    match command {
        WorkflowCommands::List => catalog::list(api_url, RESOURCE, None).await,
        WorkflowCommands::Get { id } => catalog::get(api_url, RESOURCE, &id).await,
        WorkflowCommands::Create(payload) => catalog::create(api_url, RESOURCE, payload).await,
        WorkflowCommands::Update { id, payload } => {
            catalog::update(api_url, RESOURCE, &id, payload).await
        }
        WorkflowCommands::Delete { id } => catalog::delete(api_url, RESOURCE, &id).await,
    }
}
