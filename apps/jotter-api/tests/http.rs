use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use jotter_api::{routes, state::AppState};
use jotter_storage::{
	BoxFuture, Error as StorageError, Folder, FolderPatch, MemoryStore, NewFolder, NewNote, Note,
	NotePatch, Repository, Result as StorageResult,
};

fn app(seed: bool) -> Router {
	routes::router(AppState::from_repository(Arc::new(MemoryStore::new(seed))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.expect("Failed to build request."),
		None => builder.body(Body::empty()).expect("Failed to build request."),
	};
	let response = app.clone().oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body is not JSON.")
	};

	(status, value)
}

#[tokio::test]
async fn health_is_ok() {
	let (status, _) = send(&app(false), "GET", "/health", None).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn creating_a_note_returns_201_with_the_stored_note() {
	let app = app(false);
	let (status, created) = send(
		&app,
		"POST",
		"/api/notes",
		Some(json!({ "title": "Ideas", "content": "{\"type\":\"doc\"}", "folderId": 1 })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(created["id"], 1);
	assert_eq!(created["title"], "Ideas");
	assert_eq!(created["folderId"], 1);
	assert_eq!(created["tags"], Value::Null);
	assert_eq!(created["createdAt"], created["updatedAt"]);

	let (status, fetched) = send(&app, "GET", "/api/notes/1", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(fetched, created);
}

#[tokio::test]
async fn all_notes_folder_cannot_be_deleted() {
	let app = app(true);
	let (status, body) = send(&app, "DELETE", "/api/folders/1", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error_code"], "folder_protected");
	assert_eq!(body["message"], "Folder not found or cannot be deleted.");

	let (_, folders) = send(&app, "GET", "/api/folders", None).await;

	assert_eq!(folders[0]["id"], 1);
	assert_eq!(folders[0]["name"], "All Notes");
}

#[tokio::test]
async fn search_is_case_insensitive() {
	let app = app(true);
	let (status, hits) = send(&app, "GET", "/api/notes/search?q=PYTHON", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(hits.as_array().map(Vec::len), Some(1));
	assert_eq!(hits[0]["title"], "Python - Notes and Packages");

	let (_, misses) = send(&app, "GET", "/api/notes/search?q=haskell", None).await;

	assert_eq!(misses, json!([]));
}

#[tokio::test]
async fn updates_keep_unspecified_fields_and_advance_updated_at() {
	let app = app(false);
	let (_, created) = send(
		&app,
		"POST",
		"/api/notes",
		Some(json!({ "title": "Draft", "tags": ["a"], "folderId": 1 })),
	)
	.await;
	let (status, updated) =
		send(&app, "PUT", "/api/notes/1", Some(json!({ "content": "{}" }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(updated["title"], "Draft");
	assert_eq!(updated["tags"], json!(["a"]));
	assert_eq!(updated["content"], "{}");

	let created: Note = serde_json::from_value(created).expect("Failed to decode note.");
	let updated: Note = serde_json::from_value(updated).expect("Failed to decode note.");

	assert!(updated.updated_at > created.updated_at);
	assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn deleting_a_folder_reassigns_its_notes() {
	let app = app(true);
	let (_, note) =
		send(&app, "POST", "/api/notes", Some(json!({ "title": "Standup", "folderId": 2 }))).await;
	let (status, _) = send(&app, "DELETE", "/api/folders/2", None).await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (_, moved) = send(&app, "GET", &format!("/api/notes/{}", note["id"]), None).await;
	let (_, work) = send(&app, "GET", "/api/notes/folder/2", None).await;
	let (status, _) = send(&app, "GET", "/api/folders/2", None).await;

	assert_eq!(moved["folderId"], 1);
	assert_eq!(work, json!([]));
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn note_lists_accept_sort_and_tag() {
	let app = app(false);

	for (title, tag) in [("beta", "x"), ("Alpha", "x"), ("gamma", "y")] {
		let note = json!({ "title": title, "tags": [tag], "folderId": 1 });

		send(&app, "POST", "/api/notes", Some(note)).await;
	}

	let (_, sorted) = send(&app, "GET", "/api/notes?sort=title-asc&tag=X", None).await;
	let titles: Vec<&str> = sorted
		.as_array()
		.expect("Notes are a list.")
		.iter()
		.filter_map(|note| note["title"].as_str())
		.collect();

	assert_eq!(titles, vec!["Alpha", "beta"]);

	let (status, body) = send(&app, "GET", "/api/notes?sort=newest", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn bad_requests_use_the_error_body() {
	let app = app(false);
	let (status, body) = send(&app, "GET", "/api/notes/abc", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_request");
	assert_eq!(body["message"], "Invalid note ID.");
	assert_eq!(body["fields"], Value::Null);

	let (status, body) = send(&app, "GET", "/api/notes/folder/abc", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Invalid folder ID.");

	let (status, body) = send(&app, "POST", "/api/notes", Some(json!({ "title": 3 }))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_request");

	let (status, body) =
		send(&app, "POST", "/api/notes", Some(json!({ "title": "x", "folderId": 7 }))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Folder 7 does not exist.");

	let (status, _) = send(&app, "POST", "/api/folders", Some(json!({ "name": " " }))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_records_are_404() {
	let app = app(false);

	let missing = [("GET", "/api/notes/9"), ("DELETE", "/api/notes/9"), ("GET", "/api/folders/9")];

	for (method, uri) in missing {
		let (status, body) = send(&app, method, uri, None).await;

		assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
		assert_eq!(body["error_code"], "not_found");
	}

	let (status, _) = send(&app, "PUT", "/api/notes/9", Some(json!({ "title": "x" }))).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn folders_are_created_and_renamed() {
	let app = app(false);
	let (status, folder) = send(
		&app,
		"POST",
		"/api/folders",
		Some(json!({ "name": "Reading", "icon": "book", "sortOrder": 4 })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(folder["sortOrder"], 4);

	let (status, renamed) =
		send(&app, "PUT", "/api/folders/2", Some(json!({ "name": "Books" }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(renamed["name"], "Books");
	assert_eq!(renamed["icon"], "book");
}

struct BrokenRepository;
impl BrokenRepository {
	fn fail<'a, T>() -> BoxFuture<'a, StorageResult<T>>
	where
		T: Send + 'a,
	{
		Box::pin(async { Err(StorageError::Backend("disk unplugged".to_string())) })
	}
}
impl Repository for BrokenRepository {
	fn list_notes(&self) -> BoxFuture<'_, StorageResult<Vec<Note>>> {
		Self::fail()
	}

	fn list_notes_by_folder(&self, _: i64) -> BoxFuture<'_, StorageResult<Vec<Note>>> {
		Self::fail()
	}

	fn search_notes<'a>(&'a self, _: &'a str) -> BoxFuture<'a, StorageResult<Vec<Note>>> {
		Self::fail()
	}

	fn get_note(&self, _: i64) -> BoxFuture<'_, StorageResult<Option<Note>>> {
		Self::fail()
	}

	fn create_note(&self, _: NewNote) -> BoxFuture<'_, StorageResult<Note>> {
		Self::fail()
	}

	fn update_note(&self, _: i64, _: NotePatch) -> BoxFuture<'_, StorageResult<Option<Note>>> {
		Self::fail()
	}

	fn delete_note(&self, _: i64) -> BoxFuture<'_, StorageResult<bool>> {
		Self::fail()
	}

	fn list_folders(&self) -> BoxFuture<'_, StorageResult<Vec<Folder>>> {
		Self::fail()
	}

	fn get_folder(&self, _: i64) -> BoxFuture<'_, StorageResult<Option<Folder>>> {
		Self::fail()
	}

	fn create_folder(&self, _: NewFolder) -> BoxFuture<'_, StorageResult<Folder>> {
		Self::fail()
	}

	fn update_folder(&self, _: i64, _: FolderPatch) -> BoxFuture<'_, StorageResult<Option<Folder>>> {
		Self::fail()
	}

	fn delete_folder(&self, _: i64) -> BoxFuture<'_, StorageResult<bool>> {
		Self::fail()
	}
}

#[tokio::test]
async fn storage_faults_are_hidden_behind_a_500() {
	let app = routes::router(AppState::from_repository(Arc::new(BrokenRepository)));
	let (status, body) = send(&app, "GET", "/api/notes", None).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["error_code"], "internal_error");
	assert_eq!(body["message"], "Internal server error.");
}
