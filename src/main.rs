use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use scholia_server::{
    app_state::AppState,
    config::Config,
    handlers::{analyze, category_defaults, health_check, list_categories},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    log::info!(
        "Using model {} at {} (key {})",
        config.llm.model_name,
        config.llm.endpoint_url,
        config.llm.masked_credential()
    );

    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            log::error!("Failed to start: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()));
        }
    };

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&state)))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(health_check)
            .service(analyze)
            .service(list_categories)
            .service(category_defaults)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
