pub mod history;
pub mod predict;
pub mod reconcile;

mod error;

pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryResponse};
pub use pisang_domain::PredictionResult;
pub use pisang_storage::BoxFuture;
pub use predict::PredictRequest;
pub use reconcile::{WritePlan, plan_write};

use std::sync::Arc;

use pisang_config::Config;
use pisang_providers::classifier;
use pisang_storage::{DocumentStore, RecordStore};

/// Black-box image classifier returning one raw score per class label.
pub trait Classifier
where
	Self: Send + Sync,
{
	fn predict<'a>(
		&'a self,
		cfg: &'a pisang_config::Classifier,
		image: &'a [u8],
	) -> BoxFuture<'a, pisang_providers::Result<Vec<f32>>>;
}

/// Both persistence backends, established once at startup.
#[derive(Clone)]
pub struct Backends {
	pub records: Arc<dyn RecordStore>,
	pub documents: Arc<dyn DocumentStore>,
}
impl Backends {
	pub fn new(records: Arc<dyn RecordStore>, documents: Arc<dyn DocumentStore>) -> Self {
		Self { records, documents }
	}
}

pub struct PisangService {
	pub cfg: Config,
	pub backends: Backends,
	pub classifier: Arc<dyn Classifier>,
}
impl PisangService {
	pub fn new(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends, classifier: Arc::new(HttpClassifier) }
	}

	pub fn with_classifier(cfg: Config, backends: Backends, classifier: Arc<dyn Classifier>) -> Self {
		Self { cfg, backends, classifier }
	}
}

struct HttpClassifier;
impl Classifier for HttpClassifier {
	fn predict<'a>(
		&'a self,
		cfg: &'a pisang_config::Classifier,
		image: &'a [u8],
	) -> BoxFuture<'a, pisang_providers::Result<Vec<f32>>> {
		Box::pin(classifier::predict(cfg, image))
	}
}
