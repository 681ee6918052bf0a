mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Client, Config, Editor, Service, Storage};

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
	if cfg.editor.autosave_debounce_ms == 0 {
		return Err(Error::Validation {
			message: "editor.autosave_debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.editor.word_scan_window == 0 {
		return Err(Error::Validation {
			message: "editor.word_scan_window must be greater than zero.".to_string(),
		});
	}
	if cfg.editor.max_spelling_suggestions == 0 {
		return Err(Error::Validation {
			message: "editor.max_spelling_suggestions must be greater than zero.".to_string(),
		});
	}
	if !(cfg.client.api_base.starts_with("http://") || cfg.client.api_base.starts_with("https://"))
	{
		return Err(Error::Validation {
			message: "client.api_base must start with http:// or https://.".to_string(),
		});
	}
	if cfg.client.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "client.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	let api_base = cfg.client.api_base.trim().trim_end_matches('/');

	cfg.client.api_base = api_base.to_string();
}
