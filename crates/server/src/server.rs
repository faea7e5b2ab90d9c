//! HTTP surface for the prediction pipeline
//!
//! One POST endpoint runs the pipeline; the remaining routes report
//! model metadata and service health. All request-shape checks (empty
//! body, missing keys) happen here, before the pipeline is invoked, and
//! every failure becomes a structured error payload. Nothing a client
//! sends can take the process down.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use agroyield_pipeline::{
    missing_fields, predict, ModelArtifact, PipelineError, PredictionRequest, REQUIRED_FIELDS,
};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, read-only service state. The artifact is loaded before the
/// listener binds and never mutated afterwards, so handlers run
/// concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub artifact: Arc<ModelArtifact>,
    pub start_time: Instant,
    pub req_count: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self {
            artifact,
            start_time: Instant::now(),
            req_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn record_request(&self) -> u64 {
        self.req_count.fetch_add(1, Ordering::Relaxed) as u64 + 1
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type SharedState = Arc<AppState>;

/// Error classification exposed to clients
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingData,
    MissingFields,
    ValidationError,
    ProcessingError,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_message: String,
    error_code: ErrorCode,
    suggestions: Vec<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn missing_data<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error_message: message.into(),
                error_code: ErrorCode::MissingData,
                suggestions: vec![
                    "Include all required agricultural parameters in JSON format".to_string(),
                    "Refer to the model-info endpoint for the input schema".to_string(),
                ],
            },
        }
    }

    fn missing_fields(missing: &[&str]) -> Self {
        let listing = missing.join(", ");
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error_message: format!("Missing required fields: {listing}"),
                error_code: ErrorCode::MissingFields,
                suggestions: vec![
                    format!("Include the following fields: {listing}"),
                    format!("Required fields are: {}", REQUIRED_FIELDS.join(", ")),
                ],
            },
        }
    }

    fn validation<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                error_message: format!("Input validation failed: {}", message.into()),
                error_code: ErrorCode::ValidationError,
                suggestions: vec![
                    "Check that categorical values are supported by the model".to_string(),
                    "Ensure boolean fields use TRUE/FALSE values".to_string(),
                ],
            },
        }
    }

    fn processing<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error_message: format!("Prediction processing failed: {}", message.into()),
                error_code: ErrorCode::ProcessingError,
                suggestions: vec![
                    "Verify input data format and values".to_string(),
                    "Contact support if the error persists".to_string(),
                ],
            },
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(message) => ApiError::validation(message),
            other => ApiError::processing(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_yield_tons_per_hectare: f64,
    confidence_level: &'static str,
    model_version: String,
    processing_time_ms: f64,
}

#[derive(Debug, Serialize)]
struct SupportedFeatures {
    regions: Vec<String>,
    soil_types: Vec<String>,
    crops: Vec<String>,
    weather_conditions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ModelInfoResponse {
    model_status: &'static str,
    model_name: String,
    model_version: String,
    training_date: String,
    supported_features: SupportedFeatures,
    api_version: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_name: String,
    uptime_secs: u64,
    req_total: u64,
}

#[derive(Debug, Serialize)]
struct ServiceInfoResponse {
    service_name: &'static str,
    version: &'static str,
    status: &'static str,
    supported_operations: Vec<&'static str>,
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let shared = Arc::new(state);
    let app = build_router(shared);
    let listener = bind_listener(addr).await?;
    info!("prediction service listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("prediction server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("unable to listen for shutdown signal: {err}");
    } else {
        info!("received shutdown signal");
    }
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address {addr}"))?;
    tokio::net::TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("failed to bind listener on {socket_addr}"))
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/v2/predict-yield", post(handle_predict))
        .route("/api/v2/model-info", get(handle_model_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_root(State(state): State<SharedState>) -> Json<ServiceInfoResponse> {
    state.record_request();
    Json(ServiceInfoResponse {
        service_name: "AgroYield Crop Yield Prediction API",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        supported_operations: vec![
            "POST /api/v2/predict-yield - Generate crop yield predictions",
            "GET /api/v2/model-info - Retrieve model information",
            "GET /health - Service liveness",
        ],
    })
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let req_total = state.record_request();
    Json(HealthResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        model_name: state.artifact.model_name.clone(),
        uptime_secs: state.uptime_seconds(),
        req_total,
    })
}

async fn handle_model_info(State(state): State<SharedState>) -> Json<ModelInfoResponse> {
    state.record_request();
    let artifact = &state.artifact;
    Json(ModelInfoResponse {
        model_status: "Active and Ready",
        model_name: artifact.model_name.clone(),
        model_version: artifact.model_version.clone(),
        training_date: artifact.training_date.clone(),
        supported_features: SupportedFeatures {
            regions: artifact.region_encoder.classes().to_vec(),
            soil_types: artifact.soil_encoder.classes().to_vec(),
            crops: artifact.crop_encoder.classes().to_vec(),
            weather_conditions: artifact.weather_encoder.classes().to_vec(),
        },
        api_version: env!("CARGO_PKG_VERSION"),
    })
}

/// The prediction endpoint.
///
/// Request-shape checks run in a fixed order before the pipeline:
/// non-empty JSON body, all nine required keys present, field types
/// valid. Only then is the pipeline invoked. Prediction either fully
/// succeeds or returns a pure error payload.
async fn handle_predict(
    State(state): State<SharedState>,
    body: String,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();
    state.record_request();

    if body.trim().is_empty() {
        return Err(ApiError::missing_data("No input data provided in request body"));
    }

    let raw: serde_json::Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::missing_data("Request body is not valid JSON"))?;

    if raw.as_object().map_or(true, |map| map.is_empty()) {
        return Err(ApiError::missing_data("No input data provided in request body"));
    }

    let missing = missing_fields(&raw);
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(&missing));
    }

    let request: PredictionRequest = serde_json::from_value(raw)
        .map_err(|err| ApiError::validation(err.to_string()))?;

    let prediction = predict(&state.artifact, &request)?;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(PredictResponse {
        predicted_yield_tons_per_hectare: round_to(prediction.yield_tons_per_hectare, 3),
        confidence_level: prediction.confidence.as_str(),
        model_version: state.artifact.model_name.clone(),
        processing_time_ms: round_to(elapsed_ms, 2),
    }))
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use agroyield_pipeline::model::{Node, Tree, YieldModel};
    use agroyield_pipeline::CategoricalEncoder;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn encoder(field: &str, classes: &[&str]) -> CategoricalEncoder {
        CategoricalEncoder::new(field, classes.iter().map(|s| s.to_string()).collect())
    }

    fn test_artifact() -> ModelArtifact {
        ModelArtifact {
            model_name: "AgroYield GBDT".to_string(),
            model_version: "2.0.1".to_string(),
            training_date: "2026-05-14".to_string(),
            region_encoder: encoder("Region", &["East", "North", "South", "West"]),
            soil_encoder: encoder("Soil_Type", &["Clay", "Loam", "Sandy", "Silt"]),
            crop_encoder: encoder("Crop", &["Barley", "Rice", "Wheat"]),
            weather_encoder: encoder("Weather_Condition", &["Cloudy", "Rainy", "Sunny"]),
            model: YieldModel {
                bias: 0.5,
                trees: vec![Tree {
                    nodes: vec![
                        Node {
                            feature_index: 3,
                            threshold: 300.0,
                            left: 1,
                            right: 2,
                            value: None,
                        },
                        Node {
                            feature_index: 0,
                            threshold: 0.0,
                            left: 0,
                            right: 0,
                            value: Some(2.0),
                        },
                        Node {
                            feature_index: 0,
                            threshold: 0.0,
                            left: 0,
                            right: 0,
                            value: Some(5.5),
                        },
                    ],
                }],
            },
        }
    }

    fn test_router() -> Router {
        let state = AppState::new(Arc::new(test_artifact()));
        build_router(Arc::new(state))
    }

    fn sample_body() -> Value {
        json!({
            "Region": "North",
            "Soil_Type": "Loam",
            "Crop": "Wheat",
            "Rainfall_mm": 450.5,
            "Temperature_Celsius": 22.5,
            "Fertilizer_Used": "TRUE",
            "Irrigation_Used": "FALSE",
            "Weather_Condition": "Sunny",
            "Days_to_Harvest": 120
        })
    }

    /// Artifact whose single split node points at out-of-range children,
    /// so scoring fails after all input checks pass.
    fn broken_artifact() -> ModelArtifact {
        let mut artifact = test_artifact();
        artifact.model = YieldModel {
            bias: 0.0,
            trees: vec![Tree {
                nodes: vec![Node {
                    feature_index: 0,
                    threshold: 10.0,
                    left: 7,
                    right: 7,
                    value: None,
                }],
            }],
        };
        artifact
    }

    async fn post_predict_to(router: Router, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v2/predict-yield")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    async fn post_predict(body: &str) -> (StatusCode, Value) {
        post_predict_to(test_router(), body).await
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_predict_success() {
        let (status, body) = post_predict(&sample_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_yield_tons_per_hectare"], 6.0);
        assert_eq!(body["confidence_level"], "High");
        assert_eq!(body["model_version"], "AgroYield GBDT");
        assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_predict_normalizes_sloppy_categoricals() {
        let mut request = sample_body();
        request["Region"] = json!(" north ");
        request["Fertilizer_Used"] = json!(" true ");

        let (status, body) = post_predict(&request.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["confidence_level"], "High");
    }

    #[tokio::test]
    async fn test_empty_body_is_missing_data() {
        let (status, body) = post_predict("").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "MISSING_DATA");
        assert!(body["suggestions"].as_array().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_empty_object_is_missing_data() {
        let (status, body) = post_predict("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "MISSING_DATA");
    }

    #[tokio::test]
    async fn test_malformed_json_is_missing_data() {
        let (status, body) = post_predict("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "MISSING_DATA");
    }

    #[tokio::test]
    async fn test_each_omitted_field_is_reported() {
        for field in REQUIRED_FIELDS {
            let mut request = sample_body();
            request.as_object_mut().unwrap().remove(field);

            let (status, body) = post_predict(&request.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error_code"], "MISSING_FIELDS");
            assert!(
                body["error_message"].as_str().unwrap().contains(field),
                "missing-field message should name {field}"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_region_is_validation_error() {
        let mut request = sample_body();
        request["Region"] = json!("Atlantis");

        let (status, body) = post_predict(&request.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert!(body["error_message"].as_str().unwrap().contains("Atlantis"));
    }

    #[tokio::test]
    async fn test_bad_flag_is_validation_error() {
        let mut request = sample_body();
        request["Irrigation_Used"] = json!("sometimes");

        let (status, body) = post_predict(&request.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_validation_error() {
        let mut request = sample_body();
        request["Rainfall_mm"] = json!("lots");

        let (status, body) = post_predict(&request.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_scoring_failure_is_processing_error() {
        let state = AppState::new(Arc::new(broken_artifact()));
        let router = build_router(Arc::new(state));

        let (status, body) = post_predict_to(router, &sample_body().to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_code"], "PROCESSING_ERROR");
        assert!(body["error_message"]
            .as_str()
            .unwrap()
            .starts_with("Prediction processing failed"));
        assert!(body["suggestions"].as_array().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_model_info_lists_vocabularies() {
        let (status, body) = get_json("/api/v2/model-info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_name"], "AgroYield GBDT");
        assert_eq!(body["model_version"], "2.0.1");
        assert_eq!(
            body["supported_features"]["regions"],
            json!(["East", "North", "South", "West"])
        );
        assert_eq!(
            body["supported_features"]["crops"],
            json!(["Barley", "Rice", "Wheat"])
        );
    }

    #[tokio::test]
    async fn test_health_shape() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["model_name"], "AgroYield GBDT");
        assert!(body["req_total"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let (status, body) = get_json("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service_name"], "AgroYield Crop Yield Prediction API");
        assert_eq!(body["supported_operations"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4.25678, 3), 4.257);
        assert_eq!(round_to(15.804999, 2), 15.8);
        assert_eq!(round_to(0.0, 3), 0.0);
    }

    #[test]
    fn test_error_codes_serialize_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::MissingData).unwrap(),
            "\"MISSING_DATA\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::MissingFields).unwrap(),
            "\"MISSING_FIELDS\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::ValidationError).unwrap(),
            "\"VALIDATION_ERROR\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::ProcessingError).unwrap(),
            "\"PROCESSING_ERROR\""
        );
    }
}
