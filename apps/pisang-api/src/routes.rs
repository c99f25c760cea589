use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use pisang_service::{Error as ServiceError, HistoryResponse, PredictRequest, PredictionResult};

use crate::state::AppState;

const MISSING_FILE_MESSAGE: &str = "File gambar harus disertakan";

pub fn router(state: AppState) -> Router {
	let max_upload_bytes = state.service.cfg.service.max_upload_bytes;

	Router::new()
		.route("/health", get(health))
		.route("/predict", post(predict))
		.route("/history", get(history))
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn predict(
	State(state): State<AppState>,
	mut multipart: Multipart,
) -> Result<Json<PredictionResult>, ApiError> {
	let mut req = PredictRequest::default();

	while let Some(field) = multipart.next_field().await? {
		let name = field.name().map(str::to_string);

		match name.as_deref() {
			Some("file") => req.image = field.bytes().await?.to_vec(),
			Some("id") => req.id = Some(field.text().await?),
			_ => {},
		}
	}

	if req.image.is_empty() {
		return Err(json_error(StatusCode::BAD_REQUEST, "MISSING_FILE", MISSING_FILE_MESSAGE));
	}

	let response = state.service.predict(req).await?;

	Ok(Json(response))
}

async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
	let response = state.service.history().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	error_code: String,
	/// Set when the record was saved but a later step failed.
	#[serde(skip_serializing_if = "Option::is_none")]
	id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	id: Option<String>,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), id: None }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidImage { .. } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_IMAGE", message),
			ServiceError::NotTargetObject =>
				json_error(StatusCode::BAD_REQUEST, "NOT_TARGET_OBJECT", message),
			ServiceError::InvalidPrediction { .. } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_PREDICTION", message),
			ServiceError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Classifier { .. } =>
				json_error(StatusCode::BAD_GATEWAY, "CLASSIFIER_ERROR", message),
			ServiceError::Taxonomy { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "TAXONOMY_ERROR", message),
			ServiceError::RecordStore { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message),
			ServiceError::DocumentStore { id, .. } => ApiError {
				id: Some(id),
				..json_error(StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_WRITE", message)
			},
			ServiceError::Internal { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message),
		}
	}
}

impl From<MultipartError> for ApiError {
	fn from(err: MultipartError) -> Self {
		json_error(err.status(), "INVALID_UPLOAD", err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.message, error_code: self.error_code, id: self.id };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
