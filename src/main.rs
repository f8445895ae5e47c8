use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use dscatalog::config::Config;
use dscatalog::middleware::{ErrorLogger, RequestId};
use dscatalog::{configure_api, AppServices};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    init_tracing(&config);

    tracing::info!("Starting DSCatalog");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.max_connections
    );

    if config.database.run_migrations {
        config
            .database
            .migrate(&db_pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    }

    let services = AppServices::mysql(&db_pool);
    let limits = config.paging;
    let origins = config.cors.allowed_origins.clone();

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::LOCATION])
            .max_age(3600);

        App::new()
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(actix_web::web::Data::new(db_pool.clone()))
            .configure(configure_api(services.clone(), limits))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("dscatalog={},actix_web=info,sqlx=warn", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.app.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
