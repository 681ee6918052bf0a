//! Debounced, serialized saving of one note's edits.
//!
//! Edits are merged into a single pending patch (latest value per field). The patch is saved
//! once the note has been quiet for the configured delay. Saves run one at a time on a
//! dedicated task, so they complete in the order the edits were made.

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use tokio::{
	sync::{mpsc, oneshot, watch},
	task::JoinHandle,
	time::{self, Duration, Instant},
};

use jotter_storage::{BoxFuture, Note, NotePatch};

use crate::{Error, Result};

/// Persists a note patch. Implemented by [`crate::NoteStore`] so saves refresh cached lists.
pub trait NoteSaver
where
	Self: Send + Sync,
{
	fn save(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Note>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
	Saved,
	Saving,
	Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEdit {
	Title(String),
	/// Full serialized document.
	Content(String),
	Tags(Vec<String>),
}
impl From<NoteEdit> for NotePatch {
	fn from(edit: NoteEdit) -> Self {
		match edit {
			NoteEdit::Title(title) => Self { title: Some(title), ..Self::default() },
			NoteEdit::Content(content) => Self { content: Some(content), ..Self::default() },
			NoteEdit::Tags(tags) => Self { tags: Some(tags), ..Self::default() },
		}
	}
}

enum Command {
	Edit(NoteEdit),
	Flush(oneshot::Sender<Result<(), String>>),
	/// One last save, then the task exits.
	Close(oneshot::Sender<Result<(), String>>),
}

pub struct Autosave {
	note_id: i64,
	saver: Arc<dyn NoteSaver>,
	delay: Duration,
	commands: mpsc::UnboundedReceiver<Command>,
	status: Arc<watch::Sender<SaveStatus>>,
	queued: Arc<AtomicUsize>,
	pending: Option<NotePatch>,
	/// The pending patch already failed once and no edit has arrived since.
	failed: bool,
}
impl Autosave {
	/// Starts the coordinator on the current tokio runtime.
	pub fn spawn(note_id: i64, saver: Arc<dyn NoteSaver>, delay: Duration) -> AutosaveHandle {
		let (commands_tx, commands) = mpsc::unbounded_channel();
		let (status, _) = watch::channel(SaveStatus::Saved);
		let status = Arc::new(status);
		let queued = Arc::new(AtomicUsize::new(0));
		let autosave = Self {
			note_id,
			saver,
			delay,
			commands,
			status: status.clone(),
			queued: queued.clone(),
			pending: None,
			failed: false,
		};
		let task = tokio::spawn(autosave.run());

		AutosaveHandle { note_id, commands: commands_tx, status, queued, task }
	}

	async fn run(mut self) {
		let mut deadline: Option<Instant> = None;

		loop {
			let command = match deadline {
				Some(at) => tokio::select! {
					command = self.commands.recv() => command,
					_ = time::sleep_until(at) => {
						deadline = None;

						let _ = self.save().await;

						continue;
					},
				},
				None => self.commands.recv().await,
			};

			match command {
				Some(Command::Edit(edit)) => {
					self.queued.fetch_sub(1, Ordering::SeqCst);
					self.pending.get_or_insert_with(NotePatch::default).merge(edit.into());
					self.failed = false;
					self.status.send_replace(SaveStatus::Saving);

					deadline = Some(Instant::now() + self.delay);
				},
				Some(Command::Flush(reply)) => {
					deadline = None;

					let result = self.save().await;
					let _ = reply.send(result);
				},
				Some(Command::Close(reply)) => {
					let result = self.save().await;
					let _ = reply.send(result);

					break;
				},
				None => {
					if !self.failed {
						let _ = self.save().await;
					}

					break;
				},
			}
		}

		tracing::debug!(note_id = self.note_id, "Autosave stopped.");
	}

	async fn save(&mut self) -> Result<(), String> {
		let Some(patch) = self.pending.take() else {
			return Ok(());
		};

		match self.saver.save(self.note_id, patch.clone()).await {
			Ok(_) => {
				self.failed = false;

				if self.queued.load(Ordering::SeqCst) == 0 {
					self.status.send_replace(SaveStatus::Saved);
				}

				tracing::debug!(note_id = self.note_id, "Note saved.");

				Ok(())
			},
			Err(err) => {
				let message = err.to_string();

				tracing::warn!(note_id = self.note_id, error = %message, "Autosave failed.");

				// Kept so the next edit or flush sends it again.
				self.pending = Some(patch);
				self.failed = true;
				self.status.send_replace(SaveStatus::Error(message.clone()));

				Err(message)
			},
		}
	}
}

/// Front end of a running [`Autosave`]. Dropping it saves whatever is still pending, unless that
/// patch already failed and nothing was edited since.
pub struct AutosaveHandle {
	note_id: i64,
	commands: mpsc::UnboundedSender<Command>,
	status: Arc<watch::Sender<SaveStatus>>,
	queued: Arc<AtomicUsize>,
	task: JoinHandle<()>,
}
impl AutosaveHandle {
	pub fn note_id(&self) -> i64 {
		self.note_id
	}

	/// Queues an edit and restarts the quiet period.
	pub fn edit(&self, edit: NoteEdit) -> Result<()> {
		self.queued.fetch_add(1, Ordering::SeqCst);
		self.status.send_replace(SaveStatus::Saving);

		self.commands.send(Command::Edit(edit)).map_err(|_| {
			self.queued.fetch_sub(1, Ordering::SeqCst);

			Error::AutosaveStopped
		})
	}

	/// Saves pending edits now and waits for the outcome.
	pub async fn flush(&self) -> Result<()> {
		let (reply, outcome) = oneshot::channel();

		self.commands.send(Command::Flush(reply)).map_err(|_| Error::AutosaveStopped)?;

		outcome
			.await
			.map_err(|_| Error::AutosaveStopped)?
			.map_err(|message| Error::Save { message })
	}

	pub fn status(&self) -> watch::Receiver<SaveStatus> {
		self.status.subscribe()
	}

	pub fn current_status(&self) -> SaveStatus {
		self.status.borrow().clone()
	}

	/// Saves pending edits once, stops the task, and waits for it to exit.
	pub async fn close(self) -> Result<()> {
		let (reply, outcome) = oneshot::channel();
		let Self { commands, task, .. } = self;

		commands.send(Command::Close(reply)).map_err(|_| Error::AutosaveStopped)?;

		drop(commands);

		let saved = outcome.await.map_err(|_| Error::AutosaveStopped)?;

		task.await.map_err(|_| Error::AutosaveStopped)?;

		saved.map_err(|message| Error::Save { message })
	}
}
