use crate::{
	Error, PredictionResult, Result,
	taxonomy::{self, NON_TARGET_LABEL, StageRange},
};

/// Smallest step of the two-decimal display scale.
const DISPLAY_STEP: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopClass {
	pub index: usize,
	/// Probability mass in `[0, 1]`.
	pub confidence: f64,
}

/// Turns raw classifier scores into a structured result.
///
/// `logits` may be unnormalized; they are passed through a softmax first. `labels` must be the
/// classifier's output ordering.
pub fn interpret<L>(logits: &[f32], labels: &[L]) -> Result<PredictionResult>
where
	L: AsRef<str>,
{
	if logits.len() != labels.len() {
		return Err(Error::Domain {
			message: format!(
				"Classifier returned {} scores for {} labels.",
				logits.len(),
				labels.len()
			),
		});
	}

	let probabilities = softmax(logits)?;
	let top = top_class(&probabilities).ok_or_else(|| Error::Domain {
		message: "Classifier returned no scores.".to_string(),
	})?;
	let label = labels[top.index].as_ref();

	if label == NON_TARGET_LABEL {
		return Err(Error::NotTargetObject);
	}

	let parts = taxonomy::decompose(label)?;
	let range = taxonomy::range_for_stage(parts.stage);
	let ripening = taxonomy::ripening_info(parts.stage);
	let nutrition = taxonomy::nutrition(parts.variety, parts.stage);

	Ok(PredictionResult {
		id: None,
		variety: parts.variety.to_string(),
		stage: parts.stage.to_string(),
		ripeness_value: ripeness_value(range, top.confidence),
		confidence: round2(top.confidence * 100.0),
		days_to_ripen: ripening.days,
		advisory_message: ripening.message.to_string(),
		glucose_range: nutrition.glucose.to_string(),
		calorie_range: nutrition.calories.to_string(),
	})
}

/// Numerically stable softmax over `f64`.
///
/// Empty, non-finite, and all-zero score vectors are rejected: they carry no usable signal.
pub fn softmax(logits: &[f32]) -> Result<Vec<f64>> {
	if logits.is_empty() {
		return Err(Error::Domain { message: "Classifier returned no scores.".to_string() });
	}
	if logits.iter().any(|value| !value.is_finite()) {
		return Err(Error::Domain {
			message: "Classifier returned a non-finite score.".to_string(),
		});
	}
	if logits.iter().all(|value| *value == 0.0) {
		return Err(Error::Domain { message: "Classifier returned all-zero scores.".to_string() });
	}

	let max = logits.iter().map(|value| f64::from(*value)).fold(f64::NEG_INFINITY, f64::max);
	let exps: Vec<f64> = logits.iter().map(|value| (f64::from(*value) - max).exp()).collect();
	let sum: f64 = exps.iter().sum();

	Ok(exps.into_iter().map(|value| value / sum).collect())
}

/// First index holding the maximum probability.
pub fn top_class(probabilities: &[f64]) -> Option<TopClass> {
	let mut best: Option<TopClass> = None;

	for (index, confidence) in probabilities.iter().copied().enumerate() {
		if best.map(|top| confidence > top.confidence).unwrap_or(true) {
			best = Some(TopClass { index, confidence });
		}
	}

	best
}

/// Places `confidence` linearly inside the stage band and rounds for display.
///
/// Higher confidence pushes the value toward the band's upper edge. For half-open bands the
/// rounded value is kept strictly below `high`.
pub fn ripeness_value(range: StageRange, confidence: f64) -> f64 {
	let confidence = confidence.clamp(0.0, 1.0);
	let value = round2(range.low + confidence * (range.high - range.low));

	if !range.closed && value >= range.high {
		return round2(range.high - DISPLAY_STEP);
	}

	value
}

pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}
