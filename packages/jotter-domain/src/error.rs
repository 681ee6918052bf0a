pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Document is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Failed to format export date: {0}")]
	DateFormat(#[from] time::error::Format),
	#[error("Document root must be a doc node, found {found}.")]
	InvalidRoot { found: String },
	#[error("Invalid {node_type} node at {path}: {message}")]
	InvalidNode { node_type: String, path: String, message: String },
	#[error("Context menu is {state}; {operation} is not available.")]
	MenuState { state: &'static str, operation: &'static str },
	#[error("Context menu has no actionable item {id:?}.")]
	UnknownMenuItem { id: String },
	#[error("Context menu item {id:?} is disabled.")]
	DisabledMenuItem { id: String },
	#[error("Dialog input does not match the open {expected} dialog.")]
	DialogMismatch { expected: &'static str },
}
