mod config;
mod db;
mod dispatch;
mod routes;
mod vision;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use config::PipelineConfig;
use db::log_service::LogService;
use dispatch::LogDispatcher;
use routes::configure_routes;
use std::env;
use vision::classifier::Classifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let pipeline = match PipelineConfig::load() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Failed to load pipeline config: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Pipeline config loading failed: {}", e),
            ));
        }
    };

    let classifier = match Classifier::load(&pipeline.model.artifact, pipeline.image.clone()) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("Failed to preload model at startup: {:?}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Model loading failed: {:?}", e),
            ));
        }
    };

    // Initialize AWS configuration
    let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let dynamodb_client = DynamoDbClient::new(&aws_config);

    let logs_table = env::var("DYNAMODB_PREDLOGS_TABLE").unwrap().to_string();
    let log_service = LogService::new(dynamodb_client, logs_table);

    let dispatcher = web::Data::new(LogDispatcher::start(
        log_service.clone(),
        pipeline.logging.workers,
        pipeline.logging.queue_capacity,
    ));

    let port = env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(classifier.clone()))
            .app_data(web::Data::new(log_service.clone()))
            .app_data(dispatcher.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
