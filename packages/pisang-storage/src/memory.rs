//! Process-local stores for tests and single-node runs without Postgres.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use uuid::Uuid;

use crate::{BoxFuture, DocumentStore, Error, RecordStore, Result, models::StoredRecord};

#[derive(Default)]
pub struct MemoryRecordStore {
	entries: Mutex<Vec<StoredRecord>>,
}
impl MemoryRecordStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the store, e.g. with entries written by older clients.
	pub fn with_entries(entries: Vec<StoredRecord>) -> Self {
		Self { entries: Mutex::new(entries) }
	}

	pub fn get(&self, id: &str) -> Option<Value> {
		self.lock().iter().find(|entry| entry.id == id).map(|entry| entry.record.clone())
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn replace(&self, id: &str, record: &Value) -> Result<()> {
		let mut entries = self.lock();
		let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
			return Err(Error::NotFound(format!("Prediction {id} does not exist.")));
		};

		entry.record = record.clone();

		Ok(())
	}

	fn lock(&self) -> MutexGuard<'_, Vec<StoredRecord>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl RecordStore for MemoryRecordStore {
	fn insert<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let id = Uuid::new_v4().to_string();

			self.lock().push(StoredRecord { id: id.clone(), record: record.clone() });

			Ok(id)
		})
	}

	fn update<'a>(&'a self, id: &'a str, record: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.replace(id, record) })
	}

	fn list_all(&self) -> BoxFuture<'_, Result<Vec<StoredRecord>>> {
		Box::pin(async move { Ok(self.lock().clone()) })
	}
}

#[derive(Default)]
pub struct MemoryDocumentStore {
	documents: Mutex<Vec<Value>>,
}
impl MemoryDocumentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn documents(&self) -> Vec<Value> {
		self.documents.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl DocumentStore for MemoryDocumentStore {
	fn append<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.documents.lock().unwrap_or_else(|err| err.into_inner()).push(record.clone());

			Ok(())
		})
	}
}
