use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
	Result,
	schema::{self, Schema},
};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &pisang_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self, schema: Schema) -> Result<()> {
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(schema.lock_id())
			.execute(&mut *tx)
			.await?;

		for statement in schema::statements(schema) {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
