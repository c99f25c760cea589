use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{BoxFuture, Error, RecordStore, Result, db::Db, models::StoredRecord};

pub struct PgRecordStore {
	pub db: Db,
}
impl PgRecordStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	pub async fn insert_record(&self, record: &Value) -> Result<String> {
		let id = Uuid::new_v4().to_string();
		let now = OffsetDateTime::now_utc();

		sqlx::query(
			"\
INSERT INTO predictions (id, record, created_at, updated_at)
VALUES ($1, $2, $3, $4)",
		)
		.bind(id.as_str())
		.bind(record)
		.bind(now)
		.bind(now)
		.execute(&self.db.pool)
		.await?;

		Ok(id)
	}

	pub async fn update_record(&self, id: &str, record: &Value) -> Result<()> {
		let result = sqlx::query(
			"\
UPDATE predictions
SET
	record = $1,
	updated_at = $2
WHERE id = $3",
		)
		.bind(record)
		.bind(OffsetDateTime::now_utc())
		.bind(id)
		.execute(&self.db.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound(format!("Prediction {id} does not exist.")));
		}

		Ok(())
	}

	pub async fn list_records(&self) -> Result<Vec<StoredRecord>> {
		let rows = sqlx::query_as::<_, StoredRecord>(
			"\
SELECT id, record
FROM predictions
ORDER BY created_at ASC, id ASC",
		)
		.fetch_all(&self.db.pool)
		.await?;

		Ok(rows)
	}
}
impl RecordStore for PgRecordStore {
	fn insert<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<String>> {
		Box::pin(self.insert_record(record))
	}

	fn update<'a>(&'a self, id: &'a str, record: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.update_record(id, record))
	}

	fn list_all(&self) -> BoxFuture<'_, Result<Vec<StoredRecord>>> {
		Box::pin(self.list_records())
	}
}
