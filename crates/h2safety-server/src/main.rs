//! H2Safety API server
//!
//! Serves the project, thread, chat and report API over a MongoDB (or
//! in-memory) document store. Project data is gated by session tokens.

mod auth;
mod config;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Extension, Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use h2safety::llm::OpenAiClient;
use h2safety::rag::HttpRagClient;
use h2safety::routes::{protected_routes, public_routes, AppState};
use h2safety::store::MemoryBackend;
use h2safety::{MongoDb, Store};

use crate::auth::middleware::auth_middleware;
use crate::auth::SessionCookie;
use crate::config::{Config, DatabaseType};

#[derive(Parser, Debug)]
#[command(name = "h2safety-server", version, about = "H2Safety API server")]
struct Args {
    /// TOML config file; environment variables are used when omitted
    #[arg(short, long, env = "H2_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "h2safety=info,h2safety_server=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    info!("Starting H2Safety server on {}:{}", config.host, config.port);

    let store = connect_store(&config).await?;
    let llm = OpenAiClient::new(
        &config.llm_api_url,
        config.require_llm_api_key()?,
        &config.llm_model,
        config.llm_timeout(),
    )?;
    let rag = HttpRagClient::new(&config.rag_service_url, config.rag_timeout())?;
    info!("RAG service: {}", config.rag_service_url);

    let state = Arc::new(AppState::new(
        store,
        Arc::new(llm),
        Arc::new(rag),
        config.session_ttl_days,
    ));
    let app = build_router(state, &config);

    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid host: {}", config.host))?,
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Store> {
    match config.database_type {
        DatabaseType::MongoDB => {
            info!("Connecting to MongoDB: {}", config.database_name);
            let mongo = MongoDb::connect(&config.database_url, &config.database_name).await?;
            Ok(Store::new(Arc::new(mongo)))
        }
        DatabaseType::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Ok(Store::new(Arc::new(MemoryBackend::new())))
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-session-token"),
        ])
        .allow_credentials(true)
}

fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    let protected = protected_routes()
        .merge(auth::routes::protected_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes())
        .merge(auth::routes::public_router())
        .merge(protected)
        .layer(Extension(SessionCookie {
            secure: config.secure_cookies,
        }))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}
