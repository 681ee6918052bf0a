pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Protected folder: {message}")]
	ProtectedFolder { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<jotter_storage::Error> for Error {
	fn from(err: jotter_storage::Error) -> Self {
		match err {
			jotter_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			jotter_storage::Error::Protected(_) =>
				Self::ProtectedFolder { message: FOLDER_NOT_DELETABLE.to_string() },
			jotter_storage::Error::Backend(message) => Self::Storage { message },
		}
	}
}

pub(crate) const FOLDER_NOT_DELETABLE: &str = "Folder not found or cannot be deleted.";
