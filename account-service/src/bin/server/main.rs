use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::email::LogMailer;
use account_service::outbound::email::SmtpMailer;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::outbound::repositories::PostgresVerificationTokenRepository;
use account_service::user::ports::UserServicePort;
use auth::TokenService;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        verification_base_url = %config.verification.base_url,
        smtp_configured = config.email.is_some(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.expiration_hours),
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let verification_tokens = Arc::new(PostgresVerificationTokenRepository::new(pg_pool));
    let verification_ttl = Duration::hours(config.verification.token_ttl_hours);

    let account_service: Arc<dyn UserServicePort> = match &config.email {
        Some(email_config) => {
            let mailer = Arc::new(SmtpMailer::new(
                email_config,
                config.verification.base_url.clone(),
            )?);
            Arc::new(UserService::new(
                user_repository,
                verification_tokens,
                mailer,
                Arc::clone(&token_service),
                verification_ttl,
            ))
        }
        None => {
            tracing::info!("No SMTP configuration present, verification links will be logged");
            let mailer = Arc::new(LogMailer::new(config.verification.base_url.clone()));
            Arc::new(UserService::new(
                user_repository,
                verification_tokens,
                mailer,
                Arc::clone(&token_service),
                verification_ttl,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, token_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
