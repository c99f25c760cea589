use serde::Serialize;
use serde_json::{Map, Value};

use pisang_storage::models::StoredRecord;

use crate::{Error, PisangService, PredictionResult, Result};

pub type HistoryResponse = Vec<HistoryEntry>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HistoryEntry {
	/// Stored prediction object, every stored field kept as written.
	Record(Map<String, Value>),
	/// Stored value that does not parse as a prediction, kept verbatim.
	Raw { id: String, data: Value },
}
impl HistoryEntry {
	pub fn id(&self) -> &str {
		match self {
			Self::Record(fields) => fields.get("id").and_then(Value::as_str).unwrap_or_default(),
			Self::Raw { id, .. } => id,
		}
	}

	/// Typed view of a record entry.
	pub fn prediction(&self) -> Option<PredictionResult> {
		match self {
			Self::Record(fields) => serde_json::from_value(Value::Object(fields.clone())).ok(),
			Self::Raw { .. } => None,
		}
	}
}

pub fn normalize(entry: StoredRecord) -> HistoryEntry {
	let StoredRecord { id, record } = entry;

	match record {
		Value::Object(mut fields) if is_prediction(&fields) => {
			let has_id = fields
				.get("id")
				.and_then(Value::as_str)
				.is_some_and(|stored| !stored.trim().is_empty());

			if !has_id {
				fields.insert("id".to_string(), Value::String(id));
			}

			HistoryEntry::Record(fields)
		},
		data => HistoryEntry::Raw { id, data },
	}
}

fn is_prediction(fields: &Map<String, Value>) -> bool {
	serde_json::from_value::<PredictionResult>(Value::Object(fields.clone())).is_ok()
}

impl PisangService {
	/// All stored predictions in record store order. Never reads the document log.
	pub async fn history(&self) -> Result<HistoryResponse> {
		let entries = self
			.backends
			.records
			.list_all()
			.await
			.map_err(|err| Error::RecordStore { message: err.to_string() })?;

		Ok(entries.into_iter().map(normalize).collect())
	}
}
