use std::sync::{Arc, Mutex};

use axum::http::HeaderValue;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clickconnect::config::AppConfig;
use clickconnect::db;
use clickconnect::handlers;
use clickconnect::services::email::mailgun::MailgunProvider;
use clickconnect::services::email::{EmailProvider, NoopEmailer};
use clickconnect::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let email: Box<dyn EmailProvider> = if config.mail_api_key.is_empty() {
        tracing::info!("MAIL_API_KEY not set, email notifications disabled");
        Box::new(NoopEmailer)
    } else {
        tracing::info!(domain = %config.mail_domain, "using Mailgun email provider");
        Box::new(MailgunProvider::new(
            config.mail_api_key.clone(),
            config.mail_domain.clone(),
            config.mail_from.clone(),
        ))
    };

    let cors = if config.cors_origin.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        email,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/update", put(handlers::auth::update_profile))
        .route(
            "/api/photographers/auth/register",
            post(handlers::auth::photographer_register),
        )
        .route(
            "/api/photographers/auth/login",
            post(handlers::auth::photographer_login),
        )
        .route(
            "/api/photographers/auth/dashboard",
            get(handlers::auth::photographer_dashboard),
        )
        .route("/api/admin/auth/login", post(handlers::auth::admin_login))
        .route("/api/profiles", get(handlers::profiles::list_approved))
        .route(
            "/api/profiles/:id",
            get(handlers::profiles::get_profile).patch(handlers::profiles::update_profile),
        )
        .route(
            "/api/profiles/:id/pictures",
            patch(handlers::profiles::update_pictures),
        )
        .route(
            "/api/profiles/:id/portfolio",
            get(handlers::profiles::get_portfolio),
        )
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/mine", get(handlers::bookings::my_bookings))
        .route(
            "/api/bookings/:id/status",
            patch(handlers::bookings::update_status),
        )
        .route("/api/reviews", post(handlers::reviews::add_review))
        .route("/api/reviews/:id", get(handlers::reviews::get_reviews))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/:id/approve",
            patch(handlers::admin::approve_user),
        )
        .route(
            "/api/admin/users/:id/block",
            patch(handlers::admin::block_user),
        )
        .route("/api/admin/users/:id", delete(handlers::admin::delete_user))
        .route(
            "/api/admin/photographers",
            get(handlers::admin::list_photographers),
        )
        .route(
            "/api/admin/photographers/:id/approve",
            patch(handlers::admin::approve_photographer),
        )
        .route(
            "/api/admin/photographers/:id/block",
            patch(handlers::admin::block_photographer),
        )
        .route(
            "/api/admin/photographers/:id",
            delete(handlers::admin::delete_photographer),
        )
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route("/api/admin/dashboard", get(handlers::admin::get_dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
