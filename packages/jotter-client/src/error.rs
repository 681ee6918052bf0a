pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("Invalid API URL: {0}")]
	Url(#[from] url::ParseError),
	#[error("API returned {status} ({error_code}): {message}")]
	Api { status: u16, error_code: String, message: String },
	#[error(transparent)]
	Document(#[from] jotter_domain::Error),
	#[error("Save failed: {message}")]
	Save { message: String },
	#[error("Autosave task has stopped.")]
	AutosaveStopped,
}
