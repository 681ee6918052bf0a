use std::sync::Arc;

use tokio::{sync::watch, time::Duration};

use jotter_domain::{
	context_menu::{ContextMenu, CursorContext, EditorCommands, MenuOutcome, MenuRequest},
	document::Document,
	spelling::SpellChecker,
};
use jotter_storage::Note;

use crate::{Autosave, AutosaveHandle, NoteEdit, NoteSaver, Result, SaveStatus};

/// One open note: its title, its document, and the autosave coordinator that persists both.
pub struct EditorSession {
	title: String,
	document: Document,
	autosave: AutosaveHandle,
	checker: SpellChecker,
	word_scan_window: usize,
}
impl EditorSession {
	/// Opens `note` for editing. Unusable stored content starts as an empty document.
	pub fn open(note: &Note, saver: Arc<dyn NoteSaver>, cfg: &jotter_config::Editor) -> Self {
		let document = Document::load(note.content.as_deref());
		let delay = Duration::from_millis(cfg.autosave_debounce_ms);

		Self {
			title: note.title.clone(),
			document,
			autosave: Autosave::spawn(note.id, saver, delay),
			checker: SpellChecker::new(cfg.max_spelling_suggestions),
			word_scan_window: cfg.word_scan_window,
		}
	}

	pub fn note_id(&self) -> i64 {
		self.autosave.note_id()
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
		let title = title.into();

		if title == self.title {
			return Ok(());
		}

		self.autosave.edit(NoteEdit::Title(title.clone()))?;

		self.title = title;

		Ok(())
	}

	pub fn replace_document(&mut self, document: Document) -> Result<()> {
		if document == self.document {
			return Ok(());
		}

		let content = document.to_json_string()?;

		self.autosave.edit(NoteEdit::Content(content))?;

		self.document = document;

		Ok(())
	}

	pub fn status(&self) -> watch::Receiver<SaveStatus> {
		self.autosave.status()
	}

	pub fn current_status(&self) -> SaveStatus {
		self.autosave.current_status()
	}

	pub fn spell_checker(&self) -> &SpellChecker {
		&self.checker
	}

	/// Builds the context menu for the cursor position the editor reports.
	pub fn context_menu(&self, cursor: &CursorContext, editor: &dyn EditorCommands) -> ContextMenu {
		let request = MenuRequest::from_cursor(cursor, &self.checker, self.word_scan_window);

		ContextMenu::open(request, editor)
	}

	pub fn activate_menu_item(
		&mut self,
		menu: &mut ContextMenu,
		id: &str,
		editor: &mut dyn EditorCommands,
	) -> Result<MenuOutcome> {
		Ok(menu.activate(id, editor, &mut self.checker)?)
	}

	pub async fn flush(&self) -> Result<()> {
		self.autosave.flush().await
	}

	/// Saves anything pending and stops the autosave task.
	pub async fn close(self) -> Result<()> {
		self.autosave.close().await
	}
}
