use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use std::path::Path;
use std::sync::Arc;

use backend::config::AppConfig;
use backend::inference::catalog::CatalogFile;
use backend::inference::model::OnnxClassifier;
use backend::inference::pipeline::{ClassifierPipeline, DecisionRule};
use backend::report::llm::ReportAnalyzer;
use backend::routes::{AppState, configure_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(fatal)?;
    let catalogs = CatalogFile::load(&config.conditions_path).map_err(fatal)?;

    // Model or catalog failures at startup are fatal; nothing is served
    // with a partially loaded state.
    let tumor_model = OnnxClassifier::load(Path::new(&config.tumor_model_path)).map_err(fatal)?;
    let pneumonia_model =
        OnnxClassifier::load(Path::new(&config.pneumonia_model_path)).map_err(fatal)?;
    log::info!(
        "Loaded models: tumor={}, pneumonia={}",
        config.tumor_model_path,
        config.pneumonia_model_path
    );

    let state = web::Data::new(AppState {
        tumor: ClassifierPipeline::new(
            Arc::new(tumor_model),
            catalogs.tumor,
            DecisionRule::ArgMax,
        ),
        pneumonia: ClassifierPipeline::new(
            Arc::new(pneumonia_model),
            catalogs.pneumonia,
            DecisionRule::Threshold { cutoff: 0.5 },
        ),
        analyzer: ReportAnalyzer::new(&config.groq),
    });

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let cors = if allowed_origins.is_empty() {
            Cors::permissive()
        } else {
            allowed_origins
                .iter()
                .fold(
                    Cors::default()
                        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                        .allow_any_header()
                        .max_age(3600),
                    |cors, origin| cors.allowed_origin(origin),
                )
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn fatal<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
