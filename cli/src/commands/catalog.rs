//! Request helpers shared by the tool, category, workflow, post and banner commands.

use clap::Args;

use crate::util::{Body, api_request, exit_error, read_json_from_file};

#[derive(Args)]
pub struct PayloadArgs {
    /// Request body as a JSON string
    #[arg(long, required_unless_present = "file")]
    pub data: Option<String>,
    /// Read the request body from a file (use '-' for stdin)
    #[arg(long, short = 'f', conflicts_with = "data")]
    pub file: Option<String>,
}

impl PayloadArgs {
    pub fn into_value(self) -> serde_json::Value {
        let parsed = match (self.data, self.file) {
            (Some(data), _) => {
                serde_json::from_str(&data).map_err(|e| format!("Invalid JSON in --data: {e}"))
            }
            (None, Some(file)) => read_json_from_file(&file),
            (None, None) => Err("Provide --data or --file".to_string()),
        };
        match parsed {
            Ok(value) if value.is_object() => value,
            Ok(_) => exit_error("Request body must be a JSON object", None),
            Err(e) => exit_error(&e, Some("Pass a JSON object, e.g. --data '{\"name\":\"ChatGPT\"}'")),
        }
    }
}

pub async fn list(api_url: &str, resource: &str, search: Option<String>) -> i32 {
    let query: Vec<(String, String)> = search
        .map(|s| vec![("search".to_string(), s)])
        .unwrap_or_default();
    api_request(
        api_url,
        reqwest::Method::GET,
        &format!("/v1/{resource}"),
        None,
        &query,
    )
    .await
}

pub async fn get(api_url: &str, resource: &str, id: &str) -> i32 {
    api_request(
        api_url,
        reqwest::Method::GET,
        &format!("/v1/{resource}/{id}"),
        None,
        &[],
    )
    .await
}

pub async fn create(api_url: &str, resource: &str, payload: PayloadArgs) -> i32 {
    api_request(
        api_url,
        reqwest::Method::POST,
        &format!("/v1/{resource}"),
        Some(Body::Json(payload.into_value())),
        &[],
    )
    .await
}

pub async fn update(api_url: &str, resource: &str, id: &str, payload: PayloadArgs) -> i32 {
    api_request(
        api_url,
        reqwest::Method::PUT,
        &format!("/v1/{resource}/{id}"),
        Some(Body::Json(payload.into_value())),
        &[],
    )
    .await
}

pub async fn delete(api_url: &str, resource: &str, id: &str) -> i32 {
    api_request(
        api_url,
        reqwest::Method::DELETE,
        &format!("/v1/{resource}/{id}"),
        None,
        &[],
    )
    .await
}

pub async fn toggle(api_url: &str, resource: &str, id: &str) -> i32 {
    api_request(
        api_url,
        reqwest::Method::POST,
        &format!("/v1/{resource}/{id}/toggle"),
        None,
        &[],
    )
    .await
}
