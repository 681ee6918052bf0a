//! Client side of the note organizer: the REST client, a query cache over it, the debounced
//! autosave coordinator, and the editing session that ties them to a document.

pub mod api;
pub mod autosave;
pub mod cache;
pub mod session;

mod error;

pub use api::{HttpApi, NoteApi};
pub use autosave::{Autosave, AutosaveHandle, NoteEdit, NoteSaver, SaveStatus};
pub use cache::{NoteStore, QueryKey};
pub use error::{Error, Result};
pub use session::EditorSession;
