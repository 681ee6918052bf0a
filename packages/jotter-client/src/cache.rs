//! Read-through cache over [`NoteApi`], keyed by the query that produced each entry.
//!
//! Mutations go straight to the server and then invalidate every list the change could affect,
//! so the next read refetches. Single notes are refreshed in place from mutation responses.
//! Every invalidation bumps a generation counter, and a read only stores its result when the
//! generation it started under is still current.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, MutexGuard},
};

use jotter_service::NoteQuery;
use jotter_storage::{BoxFuture, Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch};

use crate::{NoteApi, NoteSaver, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
	AllNotes,
	Folder(i64),
	Search(String),
	Note(i64),
	Folders,
}
impl QueryKey {
	fn is_note_list(&self) -> bool {
		matches!(self, Self::AllNotes | Self::Folder(_) | Self::Search(_))
	}
}

#[derive(Debug, Default)]
struct Entries {
	map: HashMap<QueryKey, Cached>,
	generation: u64,
}
impl Entries {
	fn invalidate_where(&mut self, predicate: impl Fn(&QueryKey) -> bool) {
		self.map.retain(|key, _| !predicate(key));
		self.generation += 1;
	}
}

#[derive(Debug, Clone)]
enum Cached {
	Notes(Vec<Note>),
	Note(Note),
	Folders(Vec<Folder>),
}

pub struct NoteStore {
	api: Arc<dyn NoteApi>,
	entries: Mutex<Entries>,
}
impl NoteStore {
	pub fn new(api: Arc<dyn NoteApi>) -> Self {
		Self { api, entries: Mutex::new(Entries::default()) }
	}

	pub fn is_cached(&self, key: &QueryKey) -> bool {
		self.entries().map.contains_key(key)
	}

	pub fn invalidate(&self, key: &QueryKey) {
		self.entries().invalidate_where(|candidate| candidate == key);
	}

	pub async fn notes(&self) -> Result<Vec<Note>> {
		self.note_list(QueryKey::AllNotes).await
	}

	pub async fn notes_in_folder(&self, folder_id: i64) -> Result<Vec<Note>> {
		self.note_list(QueryKey::Folder(folder_id)).await
	}

	pub async fn search(&self, text: &str) -> Result<Vec<Note>> {
		self.note_list(QueryKey::Search(text.to_string())).await
	}

	pub async fn note(&self, id: i64) -> Result<Note> {
		let key = QueryKey::Note(id);

		if let Some(Cached::Note(note)) = self.cached(&key) {
			return Ok(note);
		}

		let generation = self.generation();
		let note = self.api.get_note(id).await?;

		self.store(key, Cached::Note(note.clone()), generation);

		Ok(note)
	}

	pub async fn folders(&self) -> Result<Vec<Folder>> {
		if let Some(Cached::Folders(folders)) = self.cached(&QueryKey::Folders) {
			return Ok(folders);
		}

		let generation = self.generation();
		let folders = self.api.list_folders().await?;

		self.store(QueryKey::Folders, Cached::Folders(folders.clone()), generation);

		Ok(folders)
	}

	pub async fn create_note(&self, note: NewNote) -> Result<Note> {
		let note = self.api.create_note(note).await?;

		self.note_changed(&note, None);

		Ok(note)
	}

	pub async fn update_note(&self, id: i64, patch: NotePatch) -> Result<Note> {
		let previous_folder = self.cached_note(id).map(|note| note.folder_id);
		let note = self.api.update_note(id, patch).await?;

		match previous_folder {
			Some(folder_id) => self.note_changed(&note, Some(folder_id)),
			None => {
				self.note_changed(&note, None);
				self.invalidate_where(|key| matches!(key, QueryKey::Folder(_)));
			},
		}

		Ok(note)
	}

	pub async fn delete_note(&self, id: i64) -> Result<()> {
		let cached = self.cached_note(id);

		self.api.delete_note(id).await?;
		self.invalidate(&QueryKey::Note(id));

		match cached {
			Some(note) => {
				self.invalidate(&QueryKey::AllNotes);
				self.invalidate(&QueryKey::Folder(note.folder_id));
				self.invalidate_where(|key| matches!(key, QueryKey::Search(_)));
			},
			None => self.invalidate_where(QueryKey::is_note_list),
		}

		Ok(())
	}

	pub async fn create_folder(&self, folder: NewFolder) -> Result<Folder> {
		let folder = self.api.create_folder(folder).await?;

		self.invalidate(&QueryKey::Folders);

		Ok(folder)
	}

	pub async fn update_folder(&self, id: i64, patch: FolderPatch) -> Result<Folder> {
		let folder = self.api.update_folder(id, patch).await?;

		self.invalidate(&QueryKey::Folders);

		Ok(folder)
	}

	/// Deleting a folder reassigns its notes, so every note entry is dropped with it.
	pub async fn delete_folder(&self, id: i64) -> Result<()> {
		self.api.delete_folder(id).await?;
		self.entries().invalidate_where(|_| true);

		tracing::debug!(folder_id = id, "Folder deleted; cached notes invalidated.");

		Ok(())
	}

	async fn note_list(&self, key: QueryKey) -> Result<Vec<Note>> {
		if let Some(Cached::Notes(notes)) = self.cached(&key) {
			return Ok(notes);
		}

		let generation = self.generation();
		let query = NoteQuery::default();
		let notes = match &key {
			QueryKey::Folder(folder_id) => self.api.list_notes_by_folder(*folder_id, &query).await?,
			QueryKey::Search(text) => self.api.search_notes(text, &query).await?,
			_ => self.api.list_notes(&query).await?,
		};

		self.store(key, Cached::Notes(notes.clone()), generation);

		Ok(notes)
	}

	fn note_changed(&self, note: &Note, previous_folder: Option<i64>) {
		let mut entries = self.entries();

		entries.invalidate_where(|key| match key {
			QueryKey::AllNotes | QueryKey::Search(_) => true,
			QueryKey::Folder(folder_id) =>
				*folder_id == note.folder_id || Some(*folder_id) == previous_folder,
			_ => false,
		});
		entries.map.insert(QueryKey::Note(note.id), Cached::Note(note.clone()));
	}

	fn cached(&self, key: &QueryKey) -> Option<Cached> {
		self.entries().map.get(key).cloned()
	}

	fn cached_note(&self, id: i64) -> Option<Note> {
		match self.cached(&QueryKey::Note(id)) {
			Some(Cached::Note(note)) => Some(note),
			_ => None,
		}
	}

	fn generation(&self) -> u64 {
		self.entries().generation
	}

	/// Stores a fetched value unless an invalidation ran since `generation` was read.
	fn store(&self, key: QueryKey, value: Cached, generation: u64) {
		let mut entries = self.entries();

		if entries.generation != generation {
			tracing::debug!(?key, "Dropped a fetch that an invalidation overtook.");

			return;
		}

		entries.map.insert(key, value);
	}

	fn invalidate_where(&self, predicate: impl Fn(&QueryKey) -> bool) {
		self.entries().invalidate_where(predicate);
	}

	fn entries(&self) -> MutexGuard<'_, Entries> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl NoteSaver for NoteStore {
	fn save(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Note>> {
		Box::pin(self.update_note(id, patch))
	}
}
