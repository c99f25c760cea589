use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub classifier: Classifier,
	pub storage: Storage,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_max_upload_bytes")]
	pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct Classifier {
	pub api_base: String,
	pub path: String,
	pub model: String,
	/// Square edge, in pixels, the image is resized to before inference.
	#[serde(default = "default_input_size")]
	pub input_size: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	#[serde(default)]
	pub backend: StorageBackend,
	/// Mutable keyed store holding the canonical record per id.
	pub records: Postgres,
	/// Append-only document log written alongside every record write.
	pub documents: Postgres,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	#[default]
	Postgres,
	Memory,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

fn default_max_upload_bytes() -> usize {
	10 * 1_024 * 1_024
}

fn default_input_size() -> u32 {
	224
}
