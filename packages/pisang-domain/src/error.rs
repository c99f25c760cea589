pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// The label table contains an entry that is not `<variety>_<stage>`.
	#[error("Label {label:?} is not in the expected <variety>_<stage> format.")]
	MalformedLabel { label: String },
	#[error("Gambar bukan pisang.")]
	NotTargetObject,
	#[error("Invalid prediction: {message}")]
	Domain { message: String },
}
