use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use ::time::OffsetDateTime;
use tokio::time::{self, Duration};

use jotter_client::{Autosave, EditorSession, Error, NoteEdit, NoteSaver, SaveStatus};
use jotter_domain::document::{Document, Node};
use jotter_storage::{BoxFuture, Note, NotePatch};

#[derive(Default)]
struct SpySaver {
	saves: Mutex<Vec<NotePatch>>,
	attempts: AtomicUsize,
	latency: Duration,
	in_flight: AtomicUsize,
	max_in_flight: AtomicUsize,
	failures_left: AtomicUsize,
}
impl SpySaver {
	fn slow(latency: Duration) -> Self {
		Self { latency, ..Self::default() }
	}

	fn failing_once() -> Self {
		Self { failures_left: AtomicUsize::new(1), ..Self::default() }
	}

	fn always_failing() -> Self {
		Self { failures_left: AtomicUsize::new(usize::MAX), ..Self::default() }
	}

	fn saves(&self) -> Vec<NotePatch> {
		self.saves.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn saved_contents(&self) -> Vec<String> {
		self.saves().into_iter().filter_map(|patch| patch.content).collect()
	}
}
impl NoteSaver for SpySaver {
	fn save(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, jotter_client::Result<Note>> {
		Box::pin(async move {
			self.attempts.fetch_add(1, Ordering::SeqCst);

			let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

			self.max_in_flight.fetch_max(running, Ordering::SeqCst);

			time::sleep(self.latency).await;

			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			if self
				.failures_left
				.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
				.is_ok()
			{
				return Err(Error::Api {
					status: 503,
					error_code: "unavailable".to_string(),
					message: "Server is restarting.".to_string(),
				});
			}

			self.saves.lock().unwrap_or_else(|err| err.into_inner()).push(patch.clone());

			Ok(Note {
				id,
				title: patch.title.unwrap_or_default(),
				content: patch.content,
				tags: patch.tags,
				folder_id: 1,
				created_at: OffsetDateTime::UNIX_EPOCH,
				updated_at: OffsetDateTime::UNIX_EPOCH,
			})
		})
	}
}

struct PanickingSaver;
impl NoteSaver for PanickingSaver {
	fn save(&self, _: i64, _: NotePatch) -> BoxFuture<'_, jotter_client::Result<Note>> {
		Box::pin(async { panic!("Saver crashed.") })
	}
}

fn note(content: Option<&str>) -> Note {
	Note {
		id: 4,
		title: "Broken".to_string(),
		content: content.map(str::to_string),
		tags: None,
		folder_id: 1,
		created_at: OffsetDateTime::UNIX_EPOCH,
		updated_at: OffsetDateTime::UNIX_EPOCH,
	}
}

fn content(text: &str) -> NoteEdit {
	NoteEdit::Content(text.to_string())
}

#[tokio::test(start_paused = true)]
async fn edits_inside_the_quiet_period_collapse_into_one_save() {
	let spy = Arc::new(SpySaver::default());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(1_000));

	for text in ["H", "He", "Hello"] {
		handle.edit(content(text)).expect("Autosave is running.");

		assert_eq!(handle.current_status(), SaveStatus::Saving);

		time::sleep(Duration::from_millis(300)).await;
	}

	assert!(spy.saves().is_empty());

	time::sleep(Duration::from_millis(1_000)).await;

	assert_eq!(spy.saved_contents(), vec!["Hello"]);
	assert_eq!(handle.current_status(), SaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn title_and_content_edits_are_saved_together() {
	let spy = Arc::new(SpySaver::default());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(500));

	handle.edit(NoteEdit::Title("Plans".to_string())).expect("Autosave is running.");
	handle.edit(content("{}")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(600)).await;

	let saves = spy.saves();

	assert_eq!(saves.len(), 1);
	assert_eq!(saves[0].title.as_deref(), Some("Plans"));
	assert_eq!(saves[0].content.as_deref(), Some("{}"));
}

#[tokio::test(start_paused = true)]
async fn saves_never_overlap_and_finish_in_order() {
	let spy = Arc::new(SpySaver::slow(Duration::from_millis(500)));
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(100));

	handle.edit(content("one")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(150)).await;

	handle.edit(content("two")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(500)).await;

	assert_eq!(spy.saved_contents(), vec!["one"]);
	assert_eq!(handle.current_status(), SaveStatus::Saving);

	time::sleep(Duration::from_millis(1_000)).await;

	assert_eq!(spy.saved_contents(), vec!["one", "two"]);
	assert_eq!(spy.max_in_flight.load(Ordering::SeqCst), 1);
	assert_eq!(handle.current_status(), SaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn failures_surface_in_the_status_and_ride_along_with_the_next_edit() {
	let spy = Arc::new(SpySaver::failing_once());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(1_000));
	let mut status = handle.status();

	handle.edit(content("draft")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(1_100)).await;

	assert!(spy.saves().is_empty());
	assert!(matches!(&*status.borrow_and_update(), SaveStatus::Error(message) if message.contains("Server is restarting.")));

	handle.edit(NoteEdit::Title("Kept".to_string())).expect("Autosave is running.");

	time::sleep(Duration::from_millis(1_100)).await;

	let saves = spy.saves();

	assert_eq!(saves.len(), 1);
	assert_eq!(saves[0].content.as_deref(), Some("draft"));
	assert_eq!(saves[0].title.as_deref(), Some("Kept"));
	assert_eq!(*status.borrow(), SaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn flush_saves_immediately() {
	let spy = Arc::new(SpySaver::default());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_secs(60));

	handle.edit(content("now")).expect("Autosave is running.");
	handle.flush().await.expect("Failed to flush.");

	assert_eq!(spy.saved_contents(), vec!["now"]);
	assert_eq!(handle.current_status(), SaveStatus::Saved);

	handle.flush().await.expect("Failed to flush.");

	assert_eq!(spy.saves().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_saves_pending_edits() {
	let spy = Arc::new(SpySaver::default());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_secs(60));

	handle.edit(content("last words")).expect("Autosave is running.");

	drop(handle);

	time::sleep(Duration::from_millis(10)).await;

	assert_eq!(spy.saved_contents(), vec!["last words"]);
}

#[tokio::test(start_paused = true)]
async fn close_makes_exactly_one_more_attempt_after_a_failure() {
	let spy = Arc::new(SpySaver::always_failing());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(100));

	handle.edit(content("doomed")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(200)).await;

	assert_eq!(spy.attempts.load(Ordering::SeqCst), 1);

	let err = handle.close().await.expect_err("The saver always fails.");

	assert!(matches!(err, Error::Save { .. }));
	assert_eq!(spy.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_does_not_resend_a_failed_patch() {
	let spy = Arc::new(SpySaver::always_failing());
	let handle = Autosave::spawn(1, spy.clone(), Duration::from_millis(100));

	handle.edit(content("doomed")).expect("Autosave is running.");

	time::sleep(Duration::from_millis(200)).await;

	drop(handle);

	time::sleep(Duration::from_millis(200)).await;

	assert_eq!(spy.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn session_loads_broken_content_as_an_empty_document() {
	let spy = Arc::new(SpySaver::default());
	let mut session =
		EditorSession::open(&note(Some("{")), spy.clone(), &jotter_config::Editor::default());

	assert_eq!(session.document(), &Document::empty());

	session.set_title("Broken").expect("Autosave is running.");

	assert_eq!(session.current_status(), SaveStatus::Saved);

	let document = Document::from_blocks(vec![Node::paragraph(vec![Node::text("Fixed")])])
		.expect("Failed to build document.");
	let expected = document.to_json_string().expect("Failed to serialize document.");

	session.replace_document(document).expect("Autosave is running.");
	session.close().await.expect("Failed to close session.");

	assert_eq!(spy.saved_contents(), vec![expected]);
}

#[tokio::test]
async fn session_keeps_its_state_when_autosave_has_stopped() {
	let mut session =
		EditorSession::open(&note(None), Arc::new(PanickingSaver), &jotter_config::Editor::default());

	session.set_title("Draft").expect("Autosave is running.");

	assert!(matches!(session.flush().await, Err(Error::AutosaveStopped)));
	assert!(matches!(session.set_title("Lost"), Err(Error::AutosaveStopped)));
	assert_eq!(session.title(), "Draft");

	let document = Document::from_blocks(vec![Node::paragraph(vec![Node::text("Lost")])])
		.expect("Failed to build document.");

	assert!(matches!(session.replace_document(document), Err(Error::AutosaveStopped)));
	assert_eq!(session.document(), &Document::empty());
}
