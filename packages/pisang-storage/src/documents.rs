use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{BoxFuture, DocumentStore, Result, db::Db, models::PredictionDocument};

pub struct PgDocumentStore {
	pub db: Db,
}
impl PgDocumentStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	pub async fn append_document(&self, record: &Value) -> Result<()> {
		sqlx::query(
			"\
INSERT INTO prediction_documents (document_id, record, created_at)
VALUES ($1, $2, $3)",
		)
		.bind(Uuid::new_v4())
		.bind(record)
		.bind(OffsetDateTime::now_utc())
		.execute(&self.db.pool)
		.await?;

		Ok(())
	}

	/// Audit view of every appended document for one record id, oldest first.
	pub async fn documents_for(&self, record_id: &str) -> Result<Vec<PredictionDocument>> {
		let rows = sqlx::query_as::<_, PredictionDocument>(
			"\
SELECT document_id, record, created_at
FROM prediction_documents
WHERE record ->> 'id' = $1
ORDER BY created_at ASC",
		)
		.bind(record_id)
		.fetch_all(&self.db.pool)
		.await?;

		Ok(rows)
	}
}
impl DocumentStore for PgDocumentStore {
	fn append<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.append_document(record))
	}
}
