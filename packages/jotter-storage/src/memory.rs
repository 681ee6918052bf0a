//! In-process repository. Every operation takes the lock once, so mutations are all-or-nothing
//! and readers never observe a half-applied folder deletion.

use std::{
	collections::BTreeMap,
	future,
	sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use time::{Duration, OffsetDateTime};

use crate::{
	ALL_NOTES_FOLDER_ID, BoxFuture, Error, Repository, Result,
	models::{Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch},
	seed,
};

pub type Clock = fn() -> OffsetDateTime;

pub struct MemoryStore {
	state: RwLock<State>,
	clock: Clock,
}
impl MemoryStore {
	/// A store holding the "All Notes" folder, plus the sample folders and note when
	/// `seed_sample_data` is set.
	pub fn new(seed_sample_data: bool) -> Self {
		Self::with_clock(seed_sample_data, OffsetDateTime::now_utc)
	}

	pub fn with_clock(seed_sample_data: bool, clock: Clock) -> Self {
		let store = Self { state: RwLock::new(State::default()), clock };

		{
			let mut state = store.write();

			state.insert_folder(seed::all_notes_folder());

			if seed_sample_data {
				for folder in seed::sample_folders() {
					state.insert_folder(folder);
				}

				let now = clock();

				state.insert_note(seed::sample_note(ALL_NOTES_FOLDER_ID), now);
			}
		}

		tracing::debug!(seed_sample_data, "In-memory store initialized.");

		store
	}

	fn read(&self) -> RwLockReadGuard<'_, State> {
		self.state.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, State> {
		self.state.write().unwrap_or_else(|err| err.into_inner())
	}

	fn notes_where(&self, predicate: impl Fn(&Note) -> bool) -> Vec<Note> {
		let mut notes: Vec<Note> =
			self.read().notes.values().filter(|note| predicate(note)).cloned().collect();

		notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

		notes
	}

	fn create_note_now(&self, note: NewNote) -> Result<Note> {
		let mut state = self.write();

		state.require_folder(note.folder_id)?;

		Ok(state.insert_note(note, (self.clock)()))
	}

	fn update_note_now(&self, id: i64, patch: NotePatch) -> Result<Option<Note>> {
		let mut state = self.write();

		if let Some(folder_id) = patch.folder_id {
			state.require_folder(folder_id)?;
		}

		let now = (self.clock)();
		let Some(note) = state.notes.get_mut(&id) else {
			return Ok(None);
		};

		if let Some(title) = patch.title {
			note.title = title;
		}
		if let Some(content) = patch.content {
			note.content = Some(content);
		}
		if let Some(tags) = patch.tags {
			note.tags = Some(tags);
		}
		if let Some(folder_id) = patch.folder_id {
			note.folder_id = folder_id;
		}

		note.updated_at = now.max(note.updated_at + Duration::MICROSECOND);

		Ok(Some(note.clone()))
	}

	fn update_folder_now(&self, id: i64, patch: FolderPatch) -> Option<Folder> {
		let mut state = self.write();
		let folder = state.folders.get_mut(&id)?;

		if let Some(name) = patch.name {
			folder.name = name;
		}
		if let Some(icon) = patch.icon {
			folder.icon = Some(icon);
		}
		if let Some(sort_order) = patch.sort_order {
			folder.sort_order = Some(sort_order);
		}

		Some(folder.clone())
	}

	fn delete_folder_now(&self, id: i64) -> Result<bool> {
		if id == ALL_NOTES_FOLDER_ID {
			return Err(Error::Protected(format!("Folder {id} cannot be deleted.")));
		}

		let mut state = self.write();

		if state.folders.remove(&id).is_none() {
			return Ok(false);
		}

		let mut moved = 0_usize;

		for note in state.notes.values_mut().filter(|note| note.folder_id == id) {
			note.folder_id = ALL_NOTES_FOLDER_ID;
			moved += 1;
		}

		tracing::debug!(folder_id = id, moved, "Folder deleted; notes reassigned.");

		Ok(true)
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::new(false)
	}
}
impl Repository for MemoryStore {
	fn list_notes(&self) -> BoxFuture<'_, Result<Vec<Note>>> {
		Box::pin(future::ready(Ok(self.notes_where(|_| true))))
	}

	fn list_notes_by_folder(&self, folder_id: i64) -> BoxFuture<'_, Result<Vec<Note>>> {
		Box::pin(future::ready(Ok(self.notes_where(|note| note.folder_id == folder_id))))
	}

	fn search_notes<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Note>>> {
		let lowered = query.to_lowercase();

		Box::pin(future::ready(Ok(self.notes_where(|note| note.matches(&lowered)))))
	}

	fn get_note(&self, id: i64) -> BoxFuture<'_, Result<Option<Note>>> {
		Box::pin(future::ready(Ok(self.read().notes.get(&id).cloned())))
	}

	fn create_note(&self, note: NewNote) -> BoxFuture<'_, Result<Note>> {
		Box::pin(future::ready(self.create_note_now(note)))
	}

	fn update_note(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Option<Note>>> {
		Box::pin(future::ready(self.update_note_now(id, patch)))
	}

	fn delete_note(&self, id: i64) -> BoxFuture<'_, Result<bool>> {
		Box::pin(future::ready(Ok(self.write().notes.remove(&id).is_some())))
	}

	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>> {
		let mut folders: Vec<Folder> = self.read().folders.values().cloned().collect();

		folders.sort_by_key(|folder| (folder.sort_order.unwrap_or(0), folder.id));

		Box::pin(future::ready(Ok(folders)))
	}

	fn get_folder(&self, id: i64) -> BoxFuture<'_, Result<Option<Folder>>> {
		Box::pin(future::ready(Ok(self.read().folders.get(&id).cloned())))
	}

	fn create_folder(&self, folder: NewFolder) -> BoxFuture<'_, Result<Folder>> {
		Box::pin(future::ready(Ok(self.write().insert_folder(folder))))
	}

	fn update_folder(&self, id: i64, patch: FolderPatch) -> BoxFuture<'_, Result<Option<Folder>>> {
		Box::pin(future::ready(Ok(self.update_folder_now(id, patch))))
	}

	fn delete_folder(&self, id: i64) -> BoxFuture<'_, Result<bool>> {
		Box::pin(future::ready(self.delete_folder_now(id)))
	}
}

struct State {
	notes: BTreeMap<i64, Note>,
	folders: BTreeMap<i64, Folder>,
	next_note_id: i64,
	next_folder_id: i64,
}
impl State {
	fn require_folder(&self, folder_id: i64) -> Result<()> {
		if self.folders.contains_key(&folder_id) {
			Ok(())
		} else {
			Err(Error::InvalidArgument(format!("Folder {folder_id} does not exist.")))
		}
	}

	fn insert_note(&mut self, note: NewNote, now: OffsetDateTime) -> Note {
		let id = self.next_note_id;
		let note = Note {
			id,
			title: note.title,
			content: note.content,
			tags: note.tags,
			folder_id: note.folder_id,
			created_at: now,
			updated_at: now,
		};

		self.next_note_id += 1;
		self.notes.insert(id, note.clone());

		note
	}

	fn insert_folder(&mut self, folder: NewFolder) -> Folder {
		let id = self.next_folder_id;
		let folder =
			Folder { id, name: folder.name, icon: folder.icon, sort_order: folder.sort_order };

		self.next_folder_id += 1;
		self.folders.insert(id, folder.clone());

		folder
	}
}
impl Default for State {
	fn default() -> Self {
		Self { notes: BTreeMap::new(), folders: BTreeMap::new(), next_note_id: 1, next_folder_id: 1 }
	}
}
