use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

const DEFAULT_ORIGINS: &str = "http://localhost:5173";

/// Build a CORS layer for the admin console from `CRALY_CORS_ORIGINS`.
///
/// - Origins: comma-separated list (default: the local console dev server)
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Authorization, Content-Type
/// - Max age: 3600s
pub fn build_cors_layer() -> CorsLayer {
    let origins_str =
        std::env::var("CRALY_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
    cors_layer_for(&parse_origins(&origins_str))
}

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect()
}

fn cors_layer_for(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins.to_vec())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn preflight_advertises_only_the_methods_routes_use() {
        let app = Router::new()
            .route("/v1/tools", get(|| async { "ok" }))
            .layer(cors_layer_for(&[HeaderValue::from_static(DEFAULT_ORIGINS)]));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/tools")
            .header("origin", DEFAULT_ORIGINS)
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let methods = response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("PUT"));
        assert!(methods.contains("DELETE"));
        assert!(!methods.contains("PATCH"));
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://localhost:5173, ,https://admin.craly.ai ");
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("https://admin.craly.ai"),
            ]
        );
    }
}
