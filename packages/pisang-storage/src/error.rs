#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Unavailable: {0}")]
	Unavailable(String),
}
