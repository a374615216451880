use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use feature_request_service::{handlers, open_store, services::FeatureService, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,actix_web=info,sqlx=warn,feature_request_service=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn build_cors(config: &Config) -> Cors {
    let mut cors = Cors::default();
    for origin in config.cors.origins() {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Starting feature-request-service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        env = %config.app.env,
        backend = ?config.store.backend,
        "Configuration loaded and validated"
    );

    let store = open_store(&config).await?;
    let service = web::Data::new(FeatureService::new(store.clone()));

    let bind_addr = (config.app.host.clone(), config.app.port);
    info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    let http_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(build_cors(&http_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .shutdown_timeout(30)
    .run();

    // actix handles SIGINT/SIGTERM and drains in-flight requests
    let result = server.await.context("HTTP server error");

    info!("HTTP server stopped, closing feature store");
    store.close().await;

    result
}
