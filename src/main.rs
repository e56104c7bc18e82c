//! ClassHub Authentication Backend
//! Mission: Login against the user store and issue/validate JWT session tokens

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classhub_backend::{
    auth::{api as auth_api, auth_middleware, AuthGate, TokenService, UserStore},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    info!("🚀 ClassHub authentication backend starting");

    let config = Config::from_env()?;

    let store = Arc::new(UserStore::new(&config.db_path)?);
    info!("🔐 Credential store initialized at: {}", config.db_path);

    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.clone(),
        config.access_ttl_ms,
        config.refresh_ttl_ms,
    ));
    let gate = Arc::new(AuthGate::new(store, tokens));

    // Public routes: health check + login.
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(gate.clone());

    // Protected routes sit behind the bearer-token middleware.
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth_api::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            gate.clone(),
            auth_middleware,
        ))
        .with_state(gate);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// CORS from the configured origin allow-list. Credentialed requests, so the
/// header lists must be explicit rather than wildcards.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid origin in ALLOWED_ORIGINS")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .expose_headers([header::AUTHORIZATION]))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classhub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents), then the crate directory for
    // runs started from elsewhere with --manifest-path.
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

async fn health_check() -> &'static str {
    "OK"
}
