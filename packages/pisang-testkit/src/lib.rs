//! Throwaway Postgres databases for the storage and HTTP integration tests.
//!
//! Every test gets fresh databases named after the store they back, created from the server in
//! `PISANG_PG_DSN` and dropped again on cleanup or drop.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use pisang_config::{Postgres, Storage, StorageBackend};

pub const DSN_ENV: &str = "PISANG_PG_DSN";

const MAINTENANCE_DATABASES: [&str; 2] = ["postgres", "template1"];

/// Which of the two backends a test database stands in for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Store {
	Records,
	Documents,
}
impl Store {
	fn prefix(self) -> &'static str {
		match self {
			Self::Records => "pisang_records_test",
			Self::Documents => "pisang_documents_test",
		}
	}
}

pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str, store: Store) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse {DSN_ENV}: {err}.")))?;
		let (maintenance, mut conn) = connect_maintenance(&base).await?;
		let name = format!("{}_{}", store.prefix(), Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create {name}: {err}.")))?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Pool settings pointing at this database.
	pub fn postgres(&self, pool_max_conns: u32) -> Postgres {
		Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// Drop can run inside a runtime, so block on a fresh one from a plain thread.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &maintenance)));

			if let Err(err) = result {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});
		let _ = handle.join();
	}
}

/// One database per backend, as the service runs in production.
pub struct TestDatabases {
	pub records: TestDatabase,
	pub documents: TestDatabase,
}
impl TestDatabases {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let records = TestDatabase::new(base_dsn, Store::Records).await?;
		let documents = TestDatabase::new(base_dsn, Store::Documents).await?;

		Ok(Self { records, documents })
	}

	pub fn storage(&self) -> Storage {
		Storage {
			backend: StorageBackend::Postgres,
			records: self.records.postgres(1),
			documents: self.documents.postgres(1),
		}
	}

	pub async fn cleanup(self) -> Result<()> {
		let Self { records, documents } = self;

		records.cleanup().await?;
		documents.cleanup().await
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Base DSN for `test`, or `None` after printing why the test is skipped.
pub fn dsn_or_skip(test: &str) -> Option<String> {
	let dsn = env_dsn();

	if dsn.is_none() {
		eprintln!("Skipping {test}; set {DSN_ENV} to run this test.");
	}

	dsn
}

async fn connect_maintenance(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut errors = Vec::new();

	for database in MAINTENANCE_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => errors.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("No maintenance database reachable ({}).", errors.join("; "))))
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	// Pools from the test may still hold connections.
	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
