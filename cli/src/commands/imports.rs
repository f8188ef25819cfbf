use clap::Subcommand;

use craly_core::import;

use crate::util::{Body, api_request, exit_error, print_json, read_text};

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Check a catalog payload against the import rules
    Validate {
        /// Payload file (use '-' for stdin)
        #[arg(long)]
        file: String,
        /// Validate locally without contacting the API
        #[arg(long)]
        offline: bool,
    },
    /// Import a catalog payload in one atomic batch
    Upload {
        /// Payload file (use '-' for stdin)
        #[arg(long)]
        file: String,
    },
    /// Print an example payload covering every collection
    Example,
}

pub async fn run(api_url: &str, command: ImportCommands) -> i32 {
    match command {
        ImportCommands::Validate { file, offline } => validate(api_url, &file, offline).await,
        ImportCommands::Upload { file } => upload(api_url, &file).await,
        ImportCommands::Example => {
            print_json(&import::example_payload(), true);
            0
        }
    }
}

fn payload_text(file: &str) -> String {
    match read_text(file) {
        Ok(text) => text,
        Err(e) => exit_error(&e, Some("Run `craly import example` for a valid payload.")),
    }
}

async fn validate(api_url: &str, file: &str, offline: bool) -> i32 {
    let text = payload_text(file);
    if offline {
        let feedback = import::validate_text(&text);
        let value = serde_json::to_value(&feedback)
            .unwrap_or_else(|e| exit_error(&format!("Failed to encode feedback: {e}"), None));
        print_json(&value, !feedback.is_error());
        return if feedback.is_error() { 1 } else { 0 };
    }

    api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/imports/validate",
        Some(Body::Text(text)),
        &[],
    )
    .await
}

async fn upload(api_url: &str, file: &str) -> i32 {
    let text = payload_text(file);
    tracing::info!(bytes = text.len(), "uploading import payload");
    api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/imports",
        Some(Body::Text(text)),
        &[],
    )
    .await
}
