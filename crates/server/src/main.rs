mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{
    config::Config,
    doc::ApiDoc,
    error::StartupError,
    routes::{course, health, root},
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use axum::{Router, routing::get};
use database::db::create_connection;
use log::{error, info};
use std::process::ExitCode;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn app(state: AppState, swagger_enabled: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/courses", get(course::get_courses))
        .route("/courses/filters", get(course::get_course_filters))
        .route("/courses/{code}", get(course::get_course_by_code));

    if swagger_enabled {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    let db = create_connection(&config.database_url).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app(AppState { db }, config.swagger_enabled))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
