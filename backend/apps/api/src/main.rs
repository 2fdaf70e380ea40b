//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! `accounts` crate.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use accounts::application::{BootstrapInput, BootstrapSuperAdminUseCase};
use accounts::domain::{AccountRepository, EmailNotifier};
use accounts::infra::SmtpSettings;
use accounts::{
    AccountsState, AuthConfig, EmailDeliveryPolicy, LogNotifier, PgAccountRepository,
    SmtpNotifier, api_router,
};
use anyhow::Context;
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Settings read from the environment at startup
struct AppSettings {
    database_url: String,
    production: bool,
    jwt_secret: Option<String>,
    client_url: String,
    smtp: Option<SmtpSettings>,
    email_delivery: Option<EmailDeliveryPolicy>,
    port: u16,
    superadmin: Option<BootstrapInput>,
}

impl AppSettings {
    fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
        let production = env::var("NODE_ENV").is_ok_and(|v| v == "production");

        let smtp = match (env::var("EMAIL_USER"), env::var("EMAIL_PASS")) {
            (Ok(username), Ok(password)) if !username.is_empty() => {
                let from = env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| format!("Placement Portal <{}>", username));
                Some(SmtpSettings {
                    host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
                    username,
                    password,
                    from,
                })
            }
            _ => None,
        };

        let email_delivery = match env::var("EMAIL_DELIVERY_POLICY") {
            Ok(code) => Some(
                EmailDeliveryPolicy::from_code(&code)
                    .with_context(|| format!("Unknown EMAIL_DELIVERY_POLICY: {}", code))?,
            ),
            Err(_) => None,
        };

        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let superadmin = match (env::var("SUPERADMIN_EMAIL"), env::var("SUPERADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(BootstrapInput {
                email,
                password,
                name: env::var("SUPERADMIN_NAME").unwrap_or_else(|_| "Super Admin".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            production,
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            smtp,
            email_delivery,
            port,
            superadmin,
        })
    }

    fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        let mut config = match (&self.jwt_secret, self.production) {
            (Some(secret), true) => AuthConfig::production(secret.as_bytes()),
            (None, true) => anyhow::bail!("JWT_SECRET must be set in production"),
            (Some(secret), false) => AuthConfig {
                jwt_secret: secret.as_bytes().to_vec(),
                ..AuthConfig::development()
            },
            (None, false) => {
                tracing::warn!("JWT_SECRET not set, sessions will not survive a restart");
                AuthConfig::development()
            }
        };

        config.client_url = self.client_url.clone();
        if let Some(policy) = self.email_delivery {
            config.email_delivery = policy;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    success: bool,
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placement_api=info,accounts=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = AppSettings::from_env()?;
    let config = Arc::new(settings.auth_config()?);

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = Arc::new(PgAccountRepository::new(pool.clone()));

    // Startup cleanup: expired codes and reset tokens.
    // Errors here should not prevent server startup
    match repo.clear_expired_tokens(chrono::Utc::now()).await {
        Ok(cleared) => {
            tracing::info!(tokens_cleared = cleared, "Expired token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Expired token cleanup failed, continuing anyway");
        }
    }

    if let Some(input) = settings.superadmin.take() {
        BootstrapSuperAdminUseCase::new(repo.clone(), config.clone())
            .execute(input)
            .await?;
    }

    match settings.smtp.clone() {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp)?;
            tracing::info!("SMTP email delivery configured");
            let state = AccountsState {
                repo,
                notifier: Arc::new(notifier),
                config,
            };
            serve(&settings, state).await
        }
        None => {
            let notifier = if settings.production {
                tracing::warn!("EMAIL_USER/EMAIL_PASS not set, emails will not be delivered");
                LogNotifier::default()
            } else {
                tracing::warn!(
                    "EMAIL_USER/EMAIL_PASS not set, verification codes and reset links \
                     are logged at debug level"
                );
                LogNotifier::revealing()
            };
            let state = AccountsState {
                repo,
                notifier: Arc::new(notifier),
                config,
            };
            serve(&settings, state).await
        }
    }
}

async fn serve<N>(
    settings: &AppSettings,
    state: AccountsState<PgAccountRepository, N>,
) -> anyhow::Result<()>
where
    N: EmailNotifier + Sync + 'static,
{
    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .client_url
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/api/health", get(health))
        .merge(api_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
