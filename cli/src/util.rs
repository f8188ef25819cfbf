use std::io::Read;

use serde_json::json;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!(
        "{}",
        serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
    );
    std::process::exit(4);
}

/// Request body for [`api_request`].
pub enum Body {
    Json(serde_json::Value),
    /// Sent verbatim with a JSON content type; the server parses it.
    Text(String),
}

/// Exit codes: 0=success (2xx), 1=client error (4xx), 2=server error (5xx),
///             3=connection error, 4=usage error
pub fn exit_code_for(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    }
}

/// Execute an API request, print the response and return the exit code.
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Body>,
    query: &[(String, String)],
) -> i32 {
    let url = match reqwest::Url::parse(&format!("{api_url}{path}")) {
        Ok(mut u) => {
            if !query.is_empty() {
                let mut q = u.query_pairs_mut();
                for (k, v) in query {
                    q.append_pair(k, v);
                }
            }
            u
        }
        Err(e) => exit_error(&format!("Invalid URL: {api_url}{path}: {e}"), None),
    };

    tracing::debug!(%method, %url, "sending request");
    let mut req = client().request(method, url);
    req = match body {
        Some(Body::Json(value)) => req.json(&value),
        Some(Body::Text(text)) => req.header("content-type", "application/json").body(text),
        None => req,
    };

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            let err = json!({
                "error": "connection_error",
                "message": format!("{e}"),
                "docs_hint": "Is the API server running? Check CRALY_API_URL."
            });
            print_json(&err, false);
            return 3;
        }
    };

    let exit_code = exit_code_for(resp.status().as_u16());
    let resp_body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({"raw_error": format!("Failed to parse response as JSON: {e}")}),
    };

    print_json(&resp_body, exit_code == 0);
    exit_code
}

/// Pretty-print to stdout on success, stderr otherwise.
pub fn print_json(value: &serde_json::Value, success: bool) {
    let formatted = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    if success {
        println!("{formatted}");
    } else {
        eprintln!("{formatted}");
    }
}

/// Read text from a file path or stdin (when path is "-").
pub fn read_text(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))
    }
}

/// Read JSON from a file path or stdin (when path is "-").
pub fn read_json_from_file(path: &str) -> Result<serde_json::Value, String> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in '{path}': {e}"))
}
