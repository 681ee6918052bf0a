//! Note and folder records plus the repository they live in.

pub mod memory;
pub mod models;

mod error;
mod seed;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use models::{Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch};

use std::{future::Future, pin::Pin};

/// Id of the catch-all folder. It always exists and receives the notes of deleted folders.
pub const ALL_NOTES_FOLDER_ID: i64 = 1;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence seam for notes and folders. Lists come back in display order: notes by
/// `updatedAt` descending (newest id first on ties), folders by `sortOrder` then id.
pub trait Repository
where
	Self: Send + Sync,
{
	fn list_notes(&self) -> BoxFuture<'_, Result<Vec<Note>>>;

	fn list_notes_by_folder(&self, folder_id: i64) -> BoxFuture<'_, Result<Vec<Note>>>;

	/// Case-insensitive substring match over title, raw content, and tags.
	fn search_notes<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn get_note(&self, id: i64) -> BoxFuture<'_, Result<Option<Note>>>;

	fn create_note(&self, note: NewNote) -> BoxFuture<'_, Result<Note>>;

	/// Returns `None` when no note has `id`.
	fn update_note(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Option<Note>>>;

	fn delete_note(&self, id: i64) -> BoxFuture<'_, Result<bool>>;

	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>>;

	fn get_folder(&self, id: i64) -> BoxFuture<'_, Result<Option<Folder>>>;

	fn create_folder(&self, folder: NewFolder) -> BoxFuture<'_, Result<Folder>>;

	fn update_folder(&self, id: i64, patch: FolderPatch) -> BoxFuture<'_, Result<Option<Folder>>>;

	/// Moves the folder's notes to [`ALL_NOTES_FOLDER_ID`] and removes the folder. Returns
	/// `false` when no folder has `id`.
	fn delete_folder(&self, id: i64) -> BoxFuture<'_, Result<bool>>;
}
