mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Classifier, Config, Postgres, Service, Storage, StorageBackend};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.max_upload_bytes == 0 {
		return Err(Error::Validation {
			message: "service.max_upload_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.classifier.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "classifier.api_base must be non-empty.".to_string(),
		});
	}
	if !cfg.classifier.path.starts_with('/') {
		return Err(Error::Validation {
			message: "classifier.path must start with '/'.".to_string(),
		});
	}
	if cfg.classifier.input_size == 0 {
		return Err(Error::Validation {
			message: "classifier.input_size must be greater than zero.".to_string(),
		});
	}
	if cfg.classifier.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "classifier.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.classifier.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("classifier.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.storage.backend == StorageBackend::Postgres {
		for (label, pg) in
			[("storage.records", &cfg.storage.records), ("storage.documents", &cfg.storage.documents)]
		{
			if pg.dsn.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label}.dsn must be non-empty.") });
			}
			if pg.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: format!("{label}.pool_max_conns must be greater than zero."),
				});
			}
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let api_base = cfg.classifier.api_base.trim().trim_end_matches('/');

	if api_base.len() != cfg.classifier.api_base.len() {
		cfg.classifier.api_base = api_base.to_string();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
