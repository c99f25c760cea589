//! Dual write of one prediction: the keyed record store first, then the document log.
//!
//! The record store owns the canonical id. A document log failure after a committed record write
//! is reported as [`Error::DocumentStore`] carrying that id; the record write is kept.

use serde_json::Value;

use crate::{Backends, Error, PisangService, PredictionResult, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WritePlan {
	/// No id yet: the record store mints one.
	Insert,
	/// The caller supplied an id: replace that record in place.
	Update { id: String },
}

pub fn plan_write(result: &PredictionResult) -> WritePlan {
	match result.assigned_id() {
		Some(id) => WritePlan::Update { id: id.to_string() },
		None => WritePlan::Insert,
	}
}

impl Backends {
	/// Writes to both stores in order and returns the id-stamped record.
	pub async fn reconcile(&self, result: PredictionResult) -> Result<PredictionResult> {
		let persisted = self.write_record(result).await?;

		self.append_document(&persisted).await?;

		Ok(persisted)
	}

	/// First step. On success the returned record always carries its canonical id.
	pub async fn write_record(&self, mut result: PredictionResult) -> Result<PredictionResult> {
		match plan_write(&result) {
			WritePlan::Insert => {
				result.id = None;

				let value = to_value(&result)?;
				let id = self
					.records
					.insert(&value)
					.await
					.map_err(|err| Error::RecordStore { message: err.to_string() })?;

				Ok(result.with_id(id))
			},
			WritePlan::Update { id } => {
				result.id = Some(id.clone());

				let value = to_value(&result)?;

				self.records.update(&id, &value).await.map_err(|err| match err {
					pisang_storage::Error::NotFound(message) => Error::NotFound { message },
					err => Error::RecordStore { message: err.to_string() },
				})?;

				Ok(result)
			},
		}
	}

	/// Second step. Only valid for a record that already went through [`Self::write_record`].
	pub async fn append_document(&self, persisted: &PredictionResult) -> Result<()> {
		let Some(id) = persisted.assigned_id() else {
			return Err(Error::Internal {
				message: "Refusing to log a prediction without a record id.".to_string(),
			});
		};
		let value = to_value(persisted)?;

		if let Err(err) = self.documents.append(&value).await {
			tracing::warn!(
				id,
				error = %err,
				"Document append failed after record write; record kept."
			);

			return Err(Error::DocumentStore { id: id.to_string(), message: err.to_string() });
		}

		Ok(())
	}
}

impl PisangService {
	pub async fn persist(&self, result: PredictionResult) -> Result<PredictionResult> {
		let plan = plan_write(&result);
		let persisted = self.backends.reconcile(result).await?;

		tracing::info!(
			id = persisted.assigned_id().unwrap_or_default(),
			updated = matches!(plan, WritePlan::Update { .. }),
			variety = %persisted.variety,
			stage = %persisted.stage,
			"Prediction persisted."
		);

		Ok(persisted)
	}
}

fn to_value(result: &PredictionResult) -> Result<Value> {
	serde_json::to_value(result).map_err(|err| Error::Internal { message: err.to_string() })
}
