mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Indexing};

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
	if cfg.backend.url.trim().is_empty() {
		return Err(Error::Validation { message: "backend.url must be non-empty.".to_string() });
	}
	if cfg.backend.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (name, value) in &cfg.backend.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("backend.default_headers.{name} must be a string."),
			});
		}
	}

	if cfg.indexing.default_per_page == 0 {
		return Err(Error::Validation {
			message: "indexing.default_per_page must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.backend.url.ends_with('/') {
		cfg.backend.url.pop();
	}
}
