pub mod auth;
pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use axum::Router;
use config::Config;
use doc::ApiDoc;
use log::info;
use crate::routes::{auth as auth_routes, cart, course, health, root, schedule, user};
use sea_orm::DbErr;
use state::AppState;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database setup failed: {0}")]
    Database(#[from] DbErr),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the full application router, including the API docs
pub fn app(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::<AppState>::with_openapi(ApiDoc::openapi())
        .routes(routes!(root::root))
        .routes(routes!(health::health))
        .routes(routes!(auth_routes::login))
        .routes(routes!(auth_routes::status))
        .routes(routes!(user::register))
        .routes(routes!(user::me))
        .routes(routes!(course::list_courses, course::create_course))
        .routes(routes!(course::trending_courses))
        .routes(routes!(
            course::get_course,
            course::update_course,
            course::delete_course
        ))
        .routes(routes!(cart::get_cart))
        .routes(routes!(cart::add_to_cart))
        .routes(routes!(cart::remove_from_cart))
        .routes(routes!(cart::clear_cart))
        .routes(routes!(cart::check_cart))
        .routes(routes!(schedule::list_schedules, schedule::create_schedule))
        .routes(routes!(schedule::get_schedule))
        .routes(routes!(schedule::add_to_schedule))
        .routes(routes!(schedule::drop_from_schedule))
        .with_state(state)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

pub async fn start_server(config: Config) -> Result<(), StartupError> {
    let state = AppState::from_config(&config).await?;
    let app = app(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on {address}, docs at /docs");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
