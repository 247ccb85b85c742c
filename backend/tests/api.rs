//! Endpoint-level tests for the prediction surface, using a stub classifier
//! in place of the ONNX sessions so behavior is deterministic and no model
//! artifacts are required.

use std::sync::Arc;

use actix_web::{App, test, web};
use image::{Rgb, RgbImage};
use ndarray::Array4;

use backend::config::GroqConfig;
use backend::error::InferenceError;
use backend::inference::catalog::CatalogFile;
use backend::inference::model::ImageClassifier;
use backend::inference::pipeline::{ClassifierPipeline, DecisionRule};
use backend::report::llm::ReportAnalyzer;
use backend::routes::{AppState, configure_routes};
use shared::{PredictionErrorResponse, PredictionResponse};

struct StubClassifier(Vec<f32>);

impl ImageClassifier for StubClassifier {
    fn predict(&self, _input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        Ok(self.0.clone())
    }
}

/// App state with fixed model outputs for each classifier.
fn test_state(tumor_output: Vec<f32>, pneumonia_output: Vec<f32>) -> web::Data<AppState> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/conditions.yaml");
    let catalogs = CatalogFile::load(path).expect("catalog file");

    web::Data::new(AppState {
        tumor: ClassifierPipeline::new(
            Arc::new(StubClassifier(tumor_output)),
            catalogs.tumor,
            DecisionRule::ArgMax,
        ),
        pneumonia: ClassifierPipeline::new(
            Arc::new(StubClassifier(pneumonia_output)),
            catalogs.pneumonia,
            DecisionRule::Threshold { cutoff: 0.5 },
        ),
        analyzer: ReportAnalyzer::new(&GroqConfig {
            api_key: "test-key".to_string(),
            model: "gemma2-9b-it".to_string(),
            // Never reached by these tests.
            endpoint: "http://127.0.0.1:9/chat/completions".to_string(),
        }),
    })
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(96, 96, Rgb([200, 150, 100]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

/// Hand-built multipart body with one file field.
fn multipart_body(file_bytes: &[u8]) -> (&'static str, Vec<u8>) {
    const BOUNDARY: &str = "test-boundary-7f2a";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (
        "multipart/form-data; boundary=test-boundary-7f2a",
        body,
    )
}

#[actix_web::test]
async fn predict_returns_known_label_and_rounded_confidence() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![0.021, 0.912_34, 0.04, 0.03], vec![0.5]))
            .configure(configure_routes),
    )
    .await;

    let (content_type, body) = multipart_body(&png_bytes());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let response: PredictionResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(response.condition, "glioma");
    assert_eq!(response.area_of_interest, "Frontal or Temporal Lobe (typically)");
    assert!((response.confidence - 0.9123).abs() < 1e-6);
}

#[actix_web::test]
async fn predict_is_repeatable_for_identical_input() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![0.7, 0.1, 0.1, 0.1], vec![0.5]))
            .configure(configure_routes),
    )
    .await;

    let png = png_bytes();
    let mut conditions = Vec::new();
    for _ in 0..2 {
        let (content_type, body) = multipart_body(&png);
        let req = test::TestRequest::post()
            .uri("/predict")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let response: PredictionResponse = test::call_and_read_body_json(&app, req).await;
        conditions.push(response);
    }
    assert_eq!(conditions[0], conditions[1]);
    assert_eq!(conditions[0].condition, "notumor");
}

#[actix_web::test]
async fn predict_rejects_malformed_upload_with_detail_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![1.0, 0.0, 0.0, 0.0], vec![0.5]))
            .configure(configure_routes),
    )
    .await;

    let (content_type, body) = multipart_body(b"not an image at all");
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    let envelope: PredictionErrorResponse = test::read_body_json(resp).await;
    assert!(envelope.detail.contains("Error during prediction"));
}

#[actix_web::test]
async fn predict_wraps_truncated_multipart_stream_in_detail_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![1.0, 0.0, 0.0, 0.0], vec![0.5]))
            .configure(configure_routes),
    )
    .await;

    // Cut the body short of its closing boundary so the upload stream
    // breaks mid-read instead of failing image decode.
    let (content_type, mut body) = multipart_body(&png_bytes());
    body.truncate(body.len() - 30);

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    let envelope: PredictionErrorResponse = test::read_body_json(resp).await;
    assert!(envelope.detail.contains("Error during prediction"));
}

#[actix_web::test]
async fn pneumonia_confidence_is_the_winning_probability() {
    // Raw scalar 0.3 -> Normal with confidence 0.7.
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![1.0, 0.0, 0.0, 0.0], vec![0.3]))
            .configure(configure_routes),
    )
    .await;

    let (content_type, body) = multipart_body(&png_bytes());
    let req = test::TestRequest::post()
        .uri("/predict-pneumonia")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let response: PredictionResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(response.condition, "Normal");
    assert_eq!(response.area_of_interest, "Lung Fields");
    assert!((response.confidence - 0.7).abs() < 1e-6);
}

#[actix_web::test]
async fn pneumonia_boundary_scalar_resolves_to_normal() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![1.0, 0.0, 0.0, 0.0], vec![0.5]))
            .configure(configure_routes),
    )
    .await;

    let (content_type, body) = multipart_body(&png_bytes());
    let req = test::TestRequest::post()
        .uri("/predict-pneumonia")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let response: PredictionResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(response.condition, "Normal");
    assert!((response.confidence - 0.5).abs() < 1e-6);
}

#[actix_web::test]
async fn pneumonia_positive_branch_keeps_raw_scalar() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(vec![1.0, 0.0, 0.0, 0.0], vec![0.87654]))
            .configure(configure_routes),
    )
    .await;

    let (content_type, body) = multipart_body(&png_bytes());
    let req = test::TestRequest::post()
        .uri("/predict-pneumonia")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();

    let response: PredictionResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(response.condition, "Pneumonia");
    assert!((response.confidence - 0.8765).abs() < 1e-6);
}
