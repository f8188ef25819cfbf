use clap::Subcommand;
use serde_json::json;

use crate::util::{Body, api_request, exit_error, read_text};

const PATH: &str = "/v1/settings/privacy-policy";

#[derive(Subcommand)]
pub enum PrivacyCommands {
    /// Print the current privacy policy
    Get,
    /// Replace the privacy policy text
    Set {
        /// Policy text
        #[arg(long, required_unless_present = "file")]
        content: Option<String>,
        /// Read the policy text from a file (use '-' for stdin)
        #[arg(long, short = 'f', conflicts_with = "content")]
        file: Option<String>,
    },
}

pub async fn run(api_url: &str, command: PrivacyCommands) -> i32 {
    match command {
        PrivacyCommands::Get => api_request(api_url, reqwest::Method::GET, PATH, None, &[]).await,
        PrivacyCommands::Set { content, file } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(file)) => read_text(&file).unwrap_or_else(|e| exit_error(&e, None)),
                (None, None) => exit_error("Provide --content or --file", None),
            };
            api_request(
                api_url,
                reqwest::Method::PUT,
                PATH,
                Some(Body::Json(json!({ "content": content }))),
                &[],
            )
            .await
        }
    }
}
