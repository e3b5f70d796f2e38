pub mod board;
pub mod client;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod openapi;
pub mod schedule;
pub mod settings;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use handlers::{
    assign_slot, create_class, delete_class, duplicate_class, get_class, healthz_live,
    healthz_ready, list_classes, not_found, root,
};
use http::header::InvalidHeaderValue;
use tower_http::LatencyUnit;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cors::{allow_list_layers, cors_layer, preflight_no_content};
use crate::error::panic_response;
use crate::ids::TimestampIds;
use crate::openapi::ApiDoc;
use crate::schedule::Schedule;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub schedule: Schedule,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let store = store::open(&settings.store).await?;
    let state = AppState {
        settings: settings.clone(),
        schedule: Schedule::new(store.clone(), Arc::new(TimestampIds)),
    };

    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("Starting Class Slots API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing class store");
    store.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Route table for the `/api` surface.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/{id}", get(get_class).delete(delete_class))
        .route("/classes/{id}/duplicate", post(duplicate_class))
        .route("/classes/{class_id}/slots/{slot_id}", put(assign_slot))
        .method_not_allowed_fallback(not_found)
}

pub fn build_router(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let cors = cors_layer(&state.settings)?;
    let (allow_methods, allow_headers) = allow_list_layers()?;
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .nest("/api", api_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    Ok(router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(allow_methods)
        .layer(allow_headers)
        .layer(trace_layer)
        .layer(middleware::from_fn(preflight_no_content)))
}
