use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// One entry of the keyed store. `record` is whatever JSON was written under `id`, which may
/// predate the current record schema.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct StoredRecord {
	pub id: String,
	pub record: Value,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PredictionDocument {
	pub document_id: Uuid,
	pub record: Value,
	pub created_at: OffsetDateTime,
}
