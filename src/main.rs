//! Ledger Gateway Server
//!
//! HTTP analytics gateway in front of a ledger query service.

use anyhow::Context;
use clap::Parser;
use ledger_gateway::api::create_router;
use ledger_gateway::config::{Config, RuntimeSettings};
use ledger_gateway::error::ErrorResponse;
use ledger_gateway::models::{
    HealthResponse, Instrument, MarketMakersRequest, OffersExercisedRequest, ParticipantRecord,
};
use ledger_gateway::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Ledger analytics gateway.
#[derive(Parser, Debug)]
#[command(name = "ledger-gateway", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config/gateway.toml")]
    config: PathBuf,

    /// Configuration profile to run
    #[arg(long = "env", env = "GATEWAY_ENV", default_value = "development")]
    environment: String,

    /// Verbose logging, including request bodies
    #[arg(long)]
    debug: bool,

    /// Never cache responses
    #[arg(long)]
    no_cache: bool,
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        ledger_gateway::api::handlers::health_check,
        ledger_gateway::api::handlers::api_entry,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            Instrument,
            MarketMakersRequest,
            OffersExercisedRequest,
            ParticipantRecord,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Analytics", description = "Ledger analytics routes"),
    ),
    info(
        title = "Ledger Gateway API",
        version = "0.2.0",
        description = "Analytics queries over a ledger query service",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let profile = config.profile(&args.environment)?;
    info!("Using profile {}", args.environment);

    let settings = RuntimeSettings {
        debug: args.debug,
        cache_allowed: !args.no_cache,
    };
    let state = AppState::from_config(profile, config.markets.clone(), settings).await?;

    let app = create_router(Arc::new(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", profile.server.host, profile.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
