pub mod db;
pub mod documents;
pub mod memory;
pub mod models;
pub mod records;
pub mod schema;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin};

use serde_json::Value;

use crate::models::StoredRecord;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Mutable key-indexed store. Source of truth for record ids.
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Stores `record` under a freshly minted id and returns that id.
	fn insert<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<String>>;

	/// Replaces the record stored under `id`. Fails with [`Error::NotFound`] for unknown ids.
	fn update<'a>(&'a self, id: &'a str, record: &'a Value) -> BoxFuture<'a, Result<()>>;

	/// Every stored entry in enumeration order.
	fn list_all(&self) -> BoxFuture<'_, Result<Vec<StoredRecord>>>;
}

/// Append-only document log. Written on every record write, never read back for ids.
pub trait DocumentStore
where
	Self: Send + Sync,
{
	fn append<'a>(&'a self, record: &'a Value) -> BoxFuture<'a, Result<()>>;
}
