//! RSVP analytics HTTP API server
//!
//! Serves the engagement dashboard: snapshot, conversion funnel and RSVP
//! velocity for each event, plus a stateless compute endpoint.

use axum::{
    Router,
    http::HeaderValue,
    response::Json,
    routing::get,
};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use time::format_description::well_known::Rfc3339;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

mod config;
mod error;
mod models;
mod routes;
mod services;
mod source;

use config::ServerConfig;
use error::{ApiError, Result};
use services::AnalyticsService;
use source::MemorySource;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub analytics: AnalyticsService,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.debug {
        "rsvp_analytics_server=debug,rsvp_analytics=debug,tower_http=debug"
    } else {
        "rsvp_analytics_server=debug,rsvp_analytics=info,tower_http=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .init();

    info!(
        "Starting RSVP analytics server on {}:{}",
        config.host, config.port
    );

    let source = match &config.seed_file {
        Some(path) => MemorySource::load(path).await?,
        None => {
            warn!("SEED_FILE not set, starting with an empty event store");
            MemorySource::new()
        }
    };

    // Create application state
    let state = AppState {
        analytics: AnalyticsService::new(Arc::new(source)),
        config: config.clone(),
    };

    let cors = cors_layer(&config.cors_origins)?;
    let app = create_router(state).layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ApiError::config("Invalid HOST value"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        // Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", routes::analytics::event_router())
        .nest("/analytics", routes::analytics::compute_router())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| ApiError::Config(format!("Invalid CORS origin: {}", o)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "rsvp-analytics-server",
        "version": env!("CARGO_PKG_VERSION"),
        "engineVersion": rsvp_analytics::version(),
        "timestamp": time::OffsetDateTime::now_utc().format(&Rfc3339).ok()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["https://example.com".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
