use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::error;
use shared::{PredictionErrorResponse, ReportErrorResponse};

use crate::inference::pipeline::ClassifierPipeline;
use crate::report::extract;
use crate::report::llm::ReportAnalyzer;

/// Process-wide read-only state, built once at startup and injected into
/// every handler. No globals.
pub struct AppState {
    pub tumor: ClassifierPipeline,
    pub pneumonia: ClassifierPipeline,
    pub analyzer: ReportAnalyzer,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict_tumor)))
        .service(web::resource("/predict-pneumonia").route(web::post().to(predict_pneumonia)))
        .service(web::resource("/analyze-report/").route(web::post().to(analyze_report)));
}

/// Read the single uploaded file out of a multipart payload. Mid-stream
/// read errors surface here so callers can wrap them in their envelope.
async fn read_upload(payload: &mut Multipart) -> Result<Vec<u8>, MultipartError> {
    let mut file_data = Vec::new();
    while let Ok(Some(mut field)) = payload.try_next().await {
        while let Some(chunk) = field.next().await {
            file_data.extend_from_slice(&chunk?);
        }
        if !file_data.is_empty() {
            break;
        }
    }
    Ok(file_data)
}

async fn predict_tumor(state: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    run_prediction(state.tumor.clone(), &mut payload).await
}

async fn predict_pneumonia(state: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    run_prediction(state.pneumonia.clone(), &mut payload).await
}

/// Shared prediction path. Inference blocks for the duration of the
/// forward pass, so it runs on the blocking pool instead of a worker.
async fn run_prediction(pipeline: ClassifierPipeline, payload: &mut Multipart) -> HttpResponse {
    let image_data = match read_upload(payload).await {
        Ok(data) => data,
        Err(e) => return prediction_error(&e.to_string()),
    };

    match web::block(move || pipeline.classify(&image_data)).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(e)) => prediction_error(&e.to_string()),
        Err(e) => prediction_error(&e.to_string()),
    }
}

async fn analyze_report(state: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    let pdf_data = match read_upload(&mut payload).await {
        Ok(data) => data,
        Err(e) => return report_error(&e.to_string()),
    };

    let report_text = match web::block(move || extract::extract_text(&pdf_data)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return report_error(&e.to_string()),
        Err(e) => return report_error(&e.to_string()),
    };

    match state.analyzer.summarize(&report_text).await {
        Ok(parsed) => HttpResponse::Ok().json(parsed),
        Err(e) => report_error(&e.to_string()),
    }
}

fn prediction_error(message: &str) -> HttpResponse {
    let detail = format!("Error during prediction: {message}");
    error!("{detail}");
    HttpResponse::InternalServerError().json(PredictionErrorResponse { detail })
}

fn report_error(message: &str) -> HttpResponse {
    error!("Report analysis failed: {message}");
    HttpResponse::InternalServerError().json(ReportErrorResponse {
        error: message.to_string(),
    })
}
