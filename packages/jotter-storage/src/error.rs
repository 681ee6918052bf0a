pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Protected: {0}")]
	Protected(String),
	#[error("Storage backend failed: {0}")]
	Backend(String),
}
