use serde::{Deserialize, Serialize};

/// One interpreted banana photo.
///
/// Field names on the wire follow the mobile client's Indonesian schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(rename = "jenis_pisang")]
	pub variety: String,
	#[serde(rename = "kategori")]
	pub stage: String,
	#[serde(rename = "nilai_kematangan")]
	pub ripeness_value: f64,
	/// Percentage in `[0, 100]`.
	#[serde(rename = "probabilitas")]
	pub confidence: f64,
	#[serde(rename = "hari_untuk_matang", with = "days_serde")]
	pub days_to_ripen: Option<i32>,
	#[serde(rename = "pesan_untuk_matang")]
	pub advisory_message: String,
	#[serde(rename = "range_glukosa")]
	pub glucose_range: String,
	#[serde(rename = "range_kalori")]
	pub calorie_range: String,
}
impl PredictionResult {
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());

		self
	}

	/// Non-empty id, if one has been assigned.
	pub fn assigned_id(&self) -> Option<&str> {
		self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
	}
}

/// `hari_untuk_matang` is an integer, or the string `"N/A"` for unmapped stages.
mod days_serde {
	use serde::{Deserialize, Deserializer, Serializer, de};

	use crate::taxonomy::UNKNOWN_DISPLAY;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Days(i32),
		Text(String),
	}

	pub fn serialize<S>(value: &Option<i32>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(days) => serializer.serialize_i32(*days),
			None => serializer.serialize_str(UNKNOWN_DISPLAY),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Raw::deserialize(deserializer)? {
			Raw::Days(days) => Ok(Some(days)),
			Raw::Text(text) if text == UNKNOWN_DISPLAY => Ok(None),
			Raw::Text(text) => Err(de::Error::custom(format!(
				"Expected an integer or {UNKNOWN_DISPLAY:?}, got {text:?}."
			))),
		}
	}
}
