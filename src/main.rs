use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use portfolio_cms::{
    constants::START_TIME,
    db::{mongo::create_store, redis::create_session_store},
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_cms=info,actix_web=info".into());

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);
    once_cell::sync::Lazy::force(&START_TIME);

    let store = match create_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to connect to the document store: {}", e);
            std::process::exit(1);
        }
    };

    let sessions = match create_session_store(&config).await {
        Ok(sessions) => sessions,
        Err(e) => {
            tracing::error!("Failed to set up the session store: {}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);
    let worker_count = config.worker_count;
    let app_state = web::Data::new(AppState::new(config, store.clone(), sessions));

    tracing::info!(
        "🚀 Starting Portfolio CMS v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&app_state.config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        handle.stop(true).await;
    });

    let outcome = server.await;

    store.shutdown().await;
    tracing::info!("Document store closed, bye");
    outcome
}
