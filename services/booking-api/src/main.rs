//! Manta Booking API
//!
//! Booking microservice for club events: reservations, entitlements, and
//! subscription lifecycle over REST.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/members` - Create a member
//! - `GET /api/v1/members/:id` - Get a member
//! - `GET /api/v1/members/:id/tiers` - Resolved tier set (advisory)
//! - `GET /api/v1/members/:id/signups` - Member's signups
//! - `GET /api/v1/members/:id/subscriptions` - Member's subscriptions
//! - `POST /api/v1/subscriptions` - Create a PENDING subscription
//! - `POST /api/v1/subscriptions/:id/activate` - Activate a subscription
//! - `POST /api/v1/events` - Create an event
//! - `GET /api/v1/events` - List upcoming events
//! - `GET /api/v1/events/:id` - Get an event
//! - `PATCH /api/v1/events/:id` - Partially update an event
//! - `GET /api/v1/events/:id/signups` - Event's signups
//! - `POST /api/v1/events/:id/signups` - Book a slot
//! - `DELETE /api/v1/events/:id/signups/:member_id` - Cancel a signup
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use manta_booking_core::BookingService;
use manta_db::pg::Repositories;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("booking_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Manta Booking API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        timezone = %config.booking.timezone,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and apply migrations
    let pool = manta_db::create_pool(&config.database_url).await?;
    manta_db::run_migrations(&pool).await?;
    tracing::info!("Database pool created, migrations applied");

    // Create repositories
    let repos = Repositories::new(pool.clone());

    // Create booking service
    let booking = BookingService::new(pool.clone(), config.booking.clone());

    // Create application state
    let state = AppState::new(booking, repos, pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, http_addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // API v1 routes
    let api_v1 = Router::new()
        // Member routes
        .route("/members", post(handlers::create_member))
        .route("/members/{id}", get(handlers::get_member))
        .route("/members/{id}/tiers", get(handlers::get_member_tiers))
        .route("/members/{id}/signups", get(handlers::list_member_signups))
        .route(
            "/members/{id}/subscriptions",
            get(handlers::list_member_subscriptions),
        )
        // Subscription routes
        .route("/subscriptions", post(handlers::create_subscription))
        .route(
            "/subscriptions/{id}/activate",
            post(handlers::activate_subscription),
        )
        // Event routes
        .route("/events", post(handlers::create_event).get(handlers::list_events))
        .route(
            "/events/{id}",
            get(handlers::get_event).patch(handlers::update_event),
        )
        // Booking routes
        .route(
            "/events/{id}/signups",
            post(handlers::create_signup).get(handlers::list_event_signups),
        )
        .route(
            "/events/{id}/signups/{member_id}",
            delete(handlers::delete_signup),
        );

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let service: IntoMakeServiceWithConnectInfo<Router, SocketAddr> =
        app.into_make_service_with_connect_info();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Latency buckets for booking operations; the write path holds row locks,
    // so the tail matters more than the median
    let booking_latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            booking_latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("booking_operation_duration_seconds".to_string()),
            booking_latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "booking_signups_created_total",
        "Total signups created"
    );
    metrics::describe_counter!(
        "booking_signups_cancelled_total",
        "Total signups cancelled"
    );
    metrics::describe_counter!(
        "booking_rejections_total",
        "Total booking rejections by operation and reason"
    );
    metrics::describe_counter!(
        "booking_subscriptions_created_total",
        "Total subscriptions created"
    );
    metrics::describe_counter!(
        "booking_subscriptions_activated_total",
        "Total subscriptions activated"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "booking_operation_duration_seconds",
        "Booking operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
