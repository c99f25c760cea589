use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use pisang_api::{
	routes,
	state::{self, AppState},
};
use pisang_config::{Classifier, Config, Postgres, Service, Storage, StorageBackend};
use pisang_domain::{CLASS_LABELS, NON_TARGET_LABEL};
use pisang_service::{Backends, BoxFuture, PisangService};
use pisang_storage::{
	DocumentStore, RecordStore,
	memory::{MemoryDocumentStore, MemoryRecordStore},
	models::StoredRecord,
};
use pisang_testkit::TestDatabases;

const BOUNDARY: &str = "pisang-test-boundary";

struct FixedClassifier {
	winner: &'static str,
}
impl pisang_service::Classifier for FixedClassifier {
	fn predict<'a>(
		&'a self,
		_: &'a Classifier,
		_: &'a [u8],
	) -> BoxFuture<'a, pisang_providers::Result<Vec<f32>>> {
		let scores = CLASS_LABELS
			.iter()
			.map(|label| if *label == self.winner { 5.0 } else { 0.0 })
			.collect();

		Box::pin(async move { Ok(scores) })
	}
}

struct DownClassifier;
impl pisang_service::Classifier for DownClassifier {
	fn predict<'a>(
		&'a self,
		_: &'a Classifier,
		_: &'a [u8],
	) -> BoxFuture<'a, pisang_providers::Result<Vec<f32>>> {
		Box::pin(async {
			Err(pisang_providers::Error::InvalidResponse {
				message: "Model server returned no predictions.".to_string(),
			})
		})
	}
}

struct DownRecords;
impl RecordStore for DownRecords {
	fn insert<'a>(&'a self, _: &'a Value) -> BoxFuture<'a, pisang_storage::Result<String>> {
		Box::pin(async { Err(unavailable()) })
	}

	fn update<'a>(&'a self, _: &'a str, _: &'a Value) -> BoxFuture<'a, pisang_storage::Result<()>> {
		Box::pin(async { Err(unavailable()) })
	}

	fn list_all(&self) -> BoxFuture<'_, pisang_storage::Result<Vec<StoredRecord>>> {
		Box::pin(async { Err(unavailable()) })
	}
}

struct DownDocuments;
impl DocumentStore for DownDocuments {
	fn append<'a>(&'a self, _: &'a Value) -> BoxFuture<'a, pisang_storage::Result<()>> {
		Box::pin(async { Err(unavailable()) })
	}
}

fn unavailable() -> pisang_storage::Error {
	pisang_storage::Error::Unavailable("Connection refused.".to_string())
}

fn test_config(max_upload_bytes: usize) -> Config {
	let postgres = || Postgres { dsn: String::new(), pool_max_conns: 1 };

	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			max_upload_bytes,
		},
		classifier: Classifier {
			api_base: "http://127.0.0.1:1".to_string(),
			path: "/v1/models/pisang16:predict".to_string(),
			model: "pisang16".to_string(),
			input_size: 224,
			timeout_ms: 1_000,
			default_headers: Map::new(),
		},
		storage: Storage {
			backend: StorageBackend::Memory,
			records: postgres(),
			documents: postgres(),
		},
	}
}

fn app_from(
	backends: Backends,
	classifier: Arc<dyn pisang_service::Classifier>,
	max_upload_bytes: usize,
) -> Router {
	let service =
		PisangService::with_classifier(test_config(max_upload_bytes), backends, classifier);

	routes::router(AppState::from_service(service))
}

fn app_with(winner: &'static str, max_upload_bytes: usize) -> Router {
	let backends =
		Backends::new(Arc::new(MemoryRecordStore::new()), Arc::new(MemoryDocumentStore::new()));

	app_from(backends, Arc::new(FixedClassifier { winner }), max_upload_bytes)
}

fn app(winner: &'static str) -> Router {
	app_with(winner, 1_024 * 1_024)
}

fn multipart_body(file: Option<&[u8]>, id: Option<&str>) -> Vec<u8> {
	let mut body = Vec::new();

	if let Some(bytes) = file {
		body.extend_from_slice(
			format!(
				"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"pisang.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
			)
			.as_bytes(),
		);
		body.extend_from_slice(bytes);
		body.extend_from_slice(b"\r\n");
	}
	if let Some(id) = id {
		body.extend_from_slice(
			format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"id\"\r\n\r\n{id}\r\n")
				.as_bytes(),
		);
	}

	body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

	body
}

fn predict_request(file: Option<&[u8]>, id: Option<&str>) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/predict")
		.header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
		.body(Body::from(multipart_body(file, id)))
		.expect("Failed to build request.")
}

fn history_request() -> Request<Body> {
	Request::builder().uri("/history").body(Body::empty()).expect("Failed to build request.")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.clone().oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let (status, _) = send(
		&app("ambon_matang"),
		Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn predict_returns_record_with_id() {
	let app = app("kepok_setengahmatang");
	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["jenis_pisang"], "kepok");
	assert_eq!(json["kategori"], "setengahmatang");
	assert_eq!(json["hari_untuk_matang"], 3);
	assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn missing_file_is_bad_request() {
	let (status, json) = send(&app("ambon_matang"), predict_request(None, Some("abc"))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error"], "File gambar harus disertakan");
	assert_eq!(json["error_code"], "MISSING_FILE");
}

#[tokio::test]
async fn non_banana_is_bad_request() {
	let app = app(NON_TARGET_LABEL);
	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error"], "Gambar bukan pisang.");

	let (_, history) = send(&app, history_request()).await;

	assert_eq!(history, Value::Array(Vec::new()));
}

#[tokio::test]
async fn resubmitting_with_id_updates_history_in_place() {
	let app = app("susu_matang");
	let (_, first) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;
	let id = first["id"].as_str().expect("Missing id.").to_string();
	let (status, second) = send(&app, predict_request(Some(b"jpeg bytes"), Some(&id))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(second["id"], id.as_str());

	let (status, history) = send(&app, history_request()).await;
	let entries = history.as_array().expect("History must be an array.");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0]["id"], id.as_str());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
	let (status, json) =
		send(&app("ambon_mentah"), predict_request(Some(b"jpeg bytes"), Some("missing"))).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
	let app = app_with("ambon_matang", 64);
	let (status, _) = send(&app, predict_request(Some(&[0_u8; 512]), None)).await;

	assert!(status.is_client_error());
}

#[tokio::test]
async fn document_log_failure_reports_committed_id() {
	let records = Arc::new(MemoryRecordStore::new());
	let app = app_from(
		Backends::new(records.clone(), Arc::new(DownDocuments)),
		Arc::new(FixedClassifier { winner: "kepok_matang" }),
		1_024 * 1_024,
	);
	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json["error_code"], "PARTIAL_WRITE");

	let id = json["id"].as_str().expect("Partial write must carry the committed id.");

	assert!(records.get(id).is_some());

	let (status, history) = send(&app, history_request()).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(history[0]["id"], id);
}

#[tokio::test]
async fn record_store_outage_is_server_error() {
	let app = app_from(
		Backends::new(Arc::new(DownRecords), Arc::new(MemoryDocumentStore::new())),
		Arc::new(FixedClassifier { winner: "ambon_matang" }),
		1_024 * 1_024,
	);
	let (status, json) = send(&app, history_request()).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json["error_code"], "STORAGE_ERROR");
	assert!(json["error"].as_str().is_some_and(|message| !message.is_empty()));

	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json["error_code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn classifier_outage_is_bad_gateway() {
	let app = app_from(
		Backends::new(Arc::new(MemoryRecordStore::new()), Arc::new(MemoryDocumentStore::new())),
		Arc::new(DownClassifier),
		1_024 * 1_024,
	);
	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "CLASSIFIER_ERROR");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PISANG_PG_DSN to run."]
async fn postgres_backends_write_both_databases() {
	let Some(base_dsn) = pisang_testkit::dsn_or_skip("postgres_backends_write_both_databases") else {
		return;
	};
	let databases = TestDatabases::new(&base_dsn).await.expect("Failed to create test databases.");
	let backends =
		state::connect_backends(&databases.storage()).await.expect("Failed to connect backends.");
	let app = app_from(
		backends,
		Arc::new(FixedClassifier { winner: "ambon_terlalumatang" }),
		1_024 * 1_024,
	);
	let (status, json) = send(&app, predict_request(Some(b"jpeg bytes"), None)).await;

	assert_eq!(status, StatusCode::OK);

	let id = json["id"].as_str().expect("Missing id.").to_string();
	let (_, history) = send(&app, history_request()).await;

	assert_eq!(history[0]["id"], id.as_str());

	let documents = pisang_storage::documents::PgDocumentStore::new(
		pisang_storage::db::Db::connect(&databases.documents.postgres(1))
			.await
			.expect("Failed to connect to documents database."),
	);
	let logged = documents.documents_for(&id).await.expect("Failed to read documents.");

	assert_eq!(logged.len(), 1);

	drop(app);
	drop(documents);
	databases.cleanup().await.expect("Failed to cleanup test databases.");
}
