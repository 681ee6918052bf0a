use jotter_client::{Error, HttpApi, NoteApi};
use jotter_service::{NoteQuery, NoteSort};
use jotter_storage::{FolderPatch, NewFolder, NewNote, NotePatch};
use jotter_testkit::TestServer;

async fn connect(seed: bool) -> (TestServer, HttpApi) {
	let server = TestServer::start(seed).await.expect("Failed to start test server.");
	let cfg = jotter_config::Client { api_base: server.api_base(), timeout_ms: 5_000 };
	let api = HttpApi::new(&cfg).expect("Failed to build client.");

	(server, api)
}

fn assert_api_error(err: Error, status: u16, code: &str) {
	match err {
		Error::Api { status: actual, error_code, .. } => {
			assert_eq!(actual, status);
			assert_eq!(error_code, code);
		},
		other => panic!("Expected an API error, got {other:?}."),
	}
}

#[tokio::test]
async fn lists_the_seeded_notebook() {
	let (server, api) = connect(true).await;
	let notes = api.list_notes(&NoteQuery::default()).await.expect("Failed to list notes.");
	let folders = api.list_folders().await.expect("Failed to list folders.");

	assert_eq!(notes.len(), 1);
	assert_eq!(notes[0].title, "Python - Notes and Packages");
	assert_eq!(
		folders.iter().map(|folder| folder.name.as_str()).collect::<Vec<_>>(),
		vec!["All Notes", "Work", "Personal", "Projects"]
	);

	server.stop().await.expect("Failed to stop test server.");
}

#[tokio::test]
async fn note_lifecycle_round_trips_over_http() {
	let (server, api) = connect(false).await;
	let created = api
		.create_note(NewNote {
			title: "Groceries".to_string(),
			content: None,
			tags: Some(vec!["home".to_string()]),
			folder_id: 1,
		})
		.await
		.expect("Failed to create note.");
	let updated = api
		.update_note(created.id, NotePatch {
			title: Some("Groceries & errands".to_string()),
			..NotePatch::default()
		})
		.await
		.expect("Failed to update note.");

	assert_eq!(updated.title, "Groceries & errands");
	assert!(updated.updated_at > created.updated_at);

	let found = api
		.search_notes("errands", &NoteQuery::default())
		.await
		.expect("Failed to search notes.");

	assert_eq!(found.iter().map(|note| note.id).collect::<Vec<_>>(), vec![created.id]);

	api.delete_note(created.id).await.expect("Failed to delete note.");

	assert_api_error(api.get_note(created.id).await.expect_err("Note was deleted."), 404, "not_found");

	server.stop().await.expect("Failed to stop test server.");
}

#[tokio::test]
async fn sort_and_tag_travel_as_query_parameters() {
	let (server, api) = connect(false).await;

	for (title, tag) in [("beta", "work"), ("Alpha", "work"), ("gamma", "home")] {
		api.create_note(NewNote {
			title: title.to_string(),
			content: None,
			tags: Some(vec![tag.to_string()]),
			folder_id: 1,
		})
		.await
		.expect("Failed to create note.");
	}

	let query = NoteQuery { sort: NoteSort::TitleAsc, tag: Some("Work".to_string()) };
	let notes = api.list_notes(&query).await.expect("Failed to list notes.");

	assert_eq!(notes.iter().map(|note| note.title.as_str()).collect::<Vec<_>>(), vec!["Alpha", "beta"]);

	server.stop().await.expect("Failed to stop test server.");
}

#[tokio::test]
async fn folder_errors_carry_the_server_error_code() {
	let (server, api) = connect(false).await;

	assert_api_error(
		api.delete_folder(1).await.expect_err("All Notes must be protected."),
		404,
		"folder_protected",
	);
	assert_api_error(
		api.create_folder(NewFolder { name: "   ".to_string(), icon: None, sort_order: None })
			.await
			.expect_err("Blank names must be rejected."),
		400,
		"invalid_request",
	);

	let folder = api
		.create_folder(NewFolder { name: "Ideas".to_string(), icon: None, sort_order: Some(5) })
		.await
		.expect("Failed to create folder.");
	let renamed = api
		.update_folder(folder.id, FolderPatch { name: Some("Someday".to_string()), ..FolderPatch::default() })
		.await
		.expect("Failed to rename folder.");

	assert_eq!(renamed.name, "Someday");
	assert_eq!(renamed.sort_order, Some(5));

	server.stop().await.expect("Failed to stop test server.");
}
