use pisang_domain::CLASS_LABELS;

use crate::{Error, PisangService, PredictionResult, Result};

#[derive(Clone, Debug, Default)]
pub struct PredictRequest {
	pub image: Vec<u8>,
	/// Id of an earlier prediction to overwrite instead of creating a new record.
	pub id: Option<String>,
}

impl PisangService {
	pub async fn predict(&self, req: PredictRequest) -> Result<PredictionResult> {
		if req.image.is_empty() {
			return Err(Error::InvalidImage { message: "File gambar harus disertakan".to_string() });
		}

		let scores = self.classifier.predict(&self.cfg.classifier, &req.image).await.map_err(
			|err| {
				tracing::warn!(error = %err, "Classifier call failed.");

				Error::from(err)
			},
		)?;
		let mut result = pisang_domain::interpret(&scores, &CLASS_LABELS)?;

		result.id = req.id.filter(|id| !id.trim().is_empty());

		self.persist(result).await
	}
}
