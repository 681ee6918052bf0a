//! Request-level rules for the note organizer: validation, folder protection, and client
//! ordering, layered over an injected [`Repository`].

mod error;
mod query;

pub use error::{Error, Result};
pub use jotter_storage::{
	ALL_NOTES_FOLDER_ID, Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch, Repository,
};
pub use query::{NoteQuery, NoteSort};

use std::sync::Arc;

use crate::error::FOLDER_NOT_DELETABLE;

const NOTE_NOT_FOUND: &str = "Note not found.";
const FOLDER_NOT_FOUND: &str = "Folder not found.";

#[derive(Clone)]
pub struct JotterService {
	repo: Arc<dyn Repository>,
}
impl JotterService {
	pub fn new(repo: Arc<dyn Repository>) -> Self {
		Self { repo }
	}

	pub async fn list_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
		let notes = self.repo.list_notes().await?;

		Ok(query.apply(notes))
	}

	pub async fn list_notes_by_folder(&self, folder_id: i64, query: &NoteQuery) -> Result<Vec<Note>> {
		let notes = self.repo.list_notes_by_folder(folder_id).await?;

		Ok(query.apply(notes))
	}

	pub async fn search_notes(&self, text: &str, query: &NoteQuery) -> Result<Vec<Note>> {
		let notes = self.repo.search_notes(text).await?;

		tracing::debug!(query = text, hits = notes.len(), "Note search finished.");

		Ok(query.apply(notes))
	}

	pub async fn get_note(&self, id: i64) -> Result<Note> {
		self.repo.get_note(id).await?.ok_or_else(note_not_found)
	}

	pub async fn create_note(&self, mut note: NewNote) -> Result<Note> {
		note.tags = note.tags.map(normalize_tags);

		let note = self.repo.create_note(note).await?;

		tracing::info!(note_id = note.id, folder_id = note.folder_id, "Note created.");

		Ok(note)
	}

	pub async fn update_note(&self, id: i64, mut patch: NotePatch) -> Result<Note> {
		patch.tags = patch.tags.map(normalize_tags);

		let note = self.repo.update_note(id, patch).await?.ok_or_else(note_not_found)?;

		tracing::debug!(note_id = id, "Note updated.");

		Ok(note)
	}

	pub async fn delete_note(&self, id: i64) -> Result<()> {
		if !self.repo.delete_note(id).await? {
			return Err(note_not_found());
		}

		tracing::info!(note_id = id, "Note deleted.");

		Ok(())
	}

	pub async fn list_folders(&self) -> Result<Vec<Folder>> {
		Ok(self.repo.list_folders().await?)
	}

	pub async fn get_folder(&self, id: i64) -> Result<Folder> {
		self.repo.get_folder(id).await?.ok_or_else(folder_not_found)
	}

	pub async fn create_folder(&self, mut folder: NewFolder) -> Result<Folder> {
		folder.name = required_name(&folder.name)?;

		let folder = self.repo.create_folder(folder).await?;

		tracing::info!(folder_id = folder.id, "Folder created.");

		Ok(folder)
	}

	pub async fn update_folder(&self, id: i64, mut patch: FolderPatch) -> Result<Folder> {
		if let Some(name) = patch.name.as_deref() {
			patch.name = Some(required_name(name)?);
		}

		self.repo.update_folder(id, patch).await?.ok_or_else(folder_not_found)
	}

	/// Deletes a folder after moving its notes to "All Notes", which itself can never be deleted.
	pub async fn delete_folder(&self, id: i64) -> Result<()> {
		if id == ALL_NOTES_FOLDER_ID {
			tracing::warn!(folder_id = id, "Refused to delete the All Notes folder.");

			return Err(Error::ProtectedFolder { message: FOLDER_NOT_DELETABLE.to_string() });
		}
		if !self.repo.delete_folder(id).await? {
			return Err(folder_not_found());
		}

		tracing::info!(folder_id = id, "Folder deleted.");

		Ok(())
	}
}

fn note_not_found() -> Error {
	Error::NotFound { message: NOTE_NOT_FOUND.to_string() }
}

fn folder_not_found() -> Error {
	Error::NotFound { message: FOLDER_NOT_FOUND.to_string() }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
	tags.into_iter()
		.map(|tag| tag.trim().to_string())
		.filter(|tag| !tag.is_empty())
		.collect()
}

fn required_name(name: &str) -> Result<String> {
	let name = name.trim();

	if name.is_empty() {
		return Err(Error::InvalidRequest { message: "Folder name must be non-empty.".to_string() });
	}

	Ok(name.to_string())
}
