pub mod classifier;
pub mod preprocess;

mod error;

pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn default_headers(headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut out = HeaderMap::new();

	for (key, value) in headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		out.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(out)
}
