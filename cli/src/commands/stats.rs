use crate::util::api_request;

/// Document counts per collection.
pub async fn run(api_url: &str) -> i32 {
    api_request(api_url, reqwest::Method::GET, "/v1/stats", None, &[]).await
}
