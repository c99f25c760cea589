use std::sync::Arc;

use pisang_config::{Config, Storage, StorageBackend};
use pisang_service::{Backends, PisangService};
use pisang_storage::{
	db::Db,
	documents::PgDocumentStore,
	memory::{MemoryDocumentStore, MemoryRecordStore},
	records::PgRecordStore,
	schema::Schema,
};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PisangService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let backends = connect_backends(&config.storage).await?;

		Ok(Self::from_service(PisangService::new(config, backends)))
	}

	pub fn from_service(service: PisangService) -> Self {
		Self { service: Arc::new(service) }
	}
}

/// Opens both stores and bootstraps their schemas.
pub async fn connect_backends(storage: &Storage) -> color_eyre::Result<Backends> {
	match storage.backend {
		StorageBackend::Postgres => {
			let records = Db::connect(&storage.records).await?;

			records.ensure_schema(Schema::Records).await?;

			let documents = Db::connect(&storage.documents).await?;

			documents.ensure_schema(Schema::Documents).await?;

			Ok(Backends::new(
				Arc::new(PgRecordStore::new(records)),
				Arc::new(PgDocumentStore::new(documents)),
			))
		},
		StorageBackend::Memory => {
			tracing::warn!("Using in-memory storage; predictions are lost on restart.");

			Ok(Backends::new(
				Arc::new(MemoryRecordStore::new()),
				Arc::new(MemoryDocumentStore::new()),
			))
		},
	}
}
