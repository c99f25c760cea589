pub mod interpret;
pub mod record;
pub mod taxonomy;

mod error;

pub use error::{Error, Result};
pub use interpret::interpret;
pub use record::PredictionResult;
pub use taxonomy::{CLASS_LABELS, NON_TARGET_LABEL, Stage, Variety};
