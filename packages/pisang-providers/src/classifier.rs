use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result, preprocess};

/// Runs one image through a TensorFlow Serving style REST endpoint and returns the raw scores.
pub async fn predict(cfg: &pisang_config::Classifier, image: &[u8]) -> Result<Vec<f32>> {
	let tensor = preprocess::image_to_tensor(image, cfg.input_size)?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "instances": [tensor] });

	tracing::debug!(model = %cfg.model, %url, "Requesting classifier prediction.");

	let res = client
		.post(url)
		.headers(crate::default_headers(&cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_prediction_response(json)
}

fn parse_prediction_response(json: Value) -> Result<Vec<f32>> {
	let row = json
		.get("predictions")
		.and_then(|v| v.as_array())
		.and_then(|rows| rows.first())
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Classifier response is missing a predictions row.".to_string(),
		})?;
	let mut scores = Vec::with_capacity(row.len());

	for value in row {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Classifier scores must be numeric.".to_string(),
		})?;

		scores.push(number as f32);
	}

	Ok(scores)
}
