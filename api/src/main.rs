use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;
mod store;

use config::{Config, StoreBackend};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Craly Admin API",
        version = "0.1.0",
        description = "Catalog administration: bulk JSON import plus tool, category, workflow, post, banner and privacy policy management."
    ),
    paths(
        routes::health::health_check,
        routes::stats::dashboard_stats,
        routes::imports::upload_import,
        routes::imports::validate_import,
        routes::imports::example_import,
        routes::tools::list_tools,
        routes::tools::get_tool,
        routes::tools::create_tool,
        routes::tools::update_tool,
        routes::tools::delete_tool,
        routes::tools::toggle_tool,
        routes::categories::list_categories,
        routes::categories::get_category,
        routes::categories::create_category,
        routes::categories::update_category,
        routes::categories::delete_category,
        routes::categories::toggle_category,
        routes::workflows::list_workflows,
        routes::workflows::get_workflow,
        routes::workflows::create_workflow,
        routes::workflows::update_workflow,
        routes::workflows::delete_workflow,
        routes::posts::list_posts,
        routes::posts::get_post,
        routes::posts::create_post,
        routes::posts::update_post,
        routes::posts::delete_post,
        routes::banners::list_banners,
        routes::banners::get_banner,
        routes::banners::create_banner,
        routes::banners::update_banner,
        routes::banners::delete_banner,
        routes::banners::toggle_banner,
        routes::settings::get_privacy_policy,
        routes::settings::update_privacy_policy,
    ),
    components(schemas(
        HealthResponse,
        routes::imports::ImportResponse,
        craly_core::error::ApiError,
        craly_core::feedback::Feedback,
        craly_core::feedback::FeedbackKind,
        craly_core::import::CollectionSummary,
        craly_core::store::Collection,
        craly_core::catalog::ToolView,
        craly_core::catalog::PostView,
        craly_core::catalog::DashboardStats,
        craly_core::model::Tool,
        craly_core::model::ToolInput,
        craly_core::model::Category,
        craly_core::model::CategoryInput,
        craly_core::model::Workflow,
        craly_core::model::WorkflowInput,
        craly_core::model::JourneyStep,
        craly_core::model::Post,
        craly_core::model::PostInput,
        craly_core::model::PostToolRef,
        craly_core::model::Banner,
        craly_core::model::BannerInput,
        craly_core::model::BannerPosition,
        craly_core::model::PrivacyPolicy,
        craly_core::model::PrivacyPolicyInput,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Storage backend in use ("postgres" or "memory")
    pub store: String,
    pub version: String,
}

/// Single-entity catalog and site content routes. They share one rate-limit
/// budget per client.
fn catalog_routes() -> Router<state::AppState> {
    Router::new()
        .merge(routes::tools::router())
        .merge(routes::categories::router())
        .merge(routes::workflows::router())
        .merge(routes::posts::router())
        .merge(routes::stats::router())
        .merge(routes::banners::router())
        .merge(routes::settings::router())
        .layer(middleware::rate_limit::catalog_layer())
}

/// All routes, with per-group rate limits.
fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::imports::router().layer(middleware::rate_limit::import_layer()))
        .merge(catalog_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer()),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "craly_api=debug,craly_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let app_state = match config.backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("../migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            state::AppState::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; catalog data is lost on restart");
            state::AppState::in_memory()
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Craly API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app(app_state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
