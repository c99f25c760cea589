pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid image: {message}")]
	InvalidImage { message: String },
	#[error("Gambar bukan pisang.")]
	NotTargetObject,
	#[error("Invalid prediction: {message}")]
	InvalidPrediction { message: String },
	#[error("Label taxonomy error: {message}")]
	Taxonomy { message: String },
	#[error("Classifier error: {message}")]
	Classifier { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	/// The keyed store rejected the write. Nothing was persisted.
	#[error("Record store error: {message}")]
	RecordStore { message: String },
	/// The keyed store committed `id`, then the document log failed. The record is not rolled back.
	#[error("Document store error after saving {id}: {message}")]
	DocumentStore { id: String, message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	/// Whether the caller sent something unusable, as opposed to a server-side failure.
	pub fn is_bad_input(&self) -> bool {
		matches!(
			self,
			Self::InvalidImage { .. }
				| Self::NotTargetObject
				| Self::InvalidPrediction { .. }
				| Self::NotFound { .. }
		)
	}
}

impl From<pisang_domain::Error> for Error {
	fn from(err: pisang_domain::Error) -> Self {
		match err {
			pisang_domain::Error::NotTargetObject => Self::NotTargetObject,
			pisang_domain::Error::Domain { message } => Self::InvalidPrediction { message },
			err @ pisang_domain::Error::MalformedLabel { .. } =>
				Self::Taxonomy { message: err.to_string() },
		}
	}
}

impl From<pisang_providers::Error> for Error {
	fn from(err: pisang_providers::Error) -> Self {
		if err.is_bad_input() {
			Self::InvalidImage { message: err.to_string() }
		} else {
			Self::Classifier { message: err.to_string() }
		}
	}
}
