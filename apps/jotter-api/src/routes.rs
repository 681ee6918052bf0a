use axum::{
	Json, Router,
	extract::{FromRequest, FromRequestParts, Path, Query, Request, State, rejection::JsonRejection},
	http::{StatusCode, request::Parts},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use jotter_service::{
	Error as ServiceError, Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch, NoteQuery,
	NoteSort,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/search", get(search_notes))
		.route("/api/notes/folder/{folder_id}", get(list_notes_by_folder))
		.route("/api/notes/{id}", get(get_note).put(update_note).delete(delete_note))
		.route("/api/folders", get(list_folders).post(create_folder))
		.route("/api/folders/{id}", get(get_folder).put(update_folder).delete(delete_folder))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_notes(
	State(state): State<AppState>,
	ApiQuery(query): ApiQuery<NoteQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let notes = state.service.list_notes(&query).await?;

	Ok(Json(notes))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: String,
	#[serde(default)]
	sort: NoteSort,
	tag: Option<String>,
}

async fn search_notes(
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let query = NoteQuery { sort: params.sort, tag: params.tag };
	let notes = state.service.search_notes(&params.q, &query).await?;

	Ok(Json(notes))
}

async fn list_notes_by_folder(
	State(state): State<AppState>,
	FolderId(folder_id): FolderId,
	ApiQuery(query): ApiQuery<NoteQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let notes = state.service.list_notes_by_folder(folder_id, &query).await?;

	Ok(Json(notes))
}

async fn get_note(
	State(state): State<AppState>,
	NoteId(id): NoteId,
) -> Result<Json<Note>, ApiError> {
	let note = state.service.get_note(id).await?;

	Ok(Json(note))
}

async fn create_note(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<NewNote>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
	let note = state.service.create_note(payload).await?;

	Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
	State(state): State<AppState>,
	NoteId(id): NoteId,
	ApiJson(payload): ApiJson<NotePatch>,
) -> Result<Json<Note>, ApiError> {
	let note = state.service.update_note(id, payload).await?;

	Ok(Json(note))
}

async fn delete_note(
	State(state): State<AppState>,
	NoteId(id): NoteId,
) -> Result<StatusCode, ApiError> {
	state.service.delete_note(id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, ApiError> {
	let folders = state.service.list_folders().await?;

	Ok(Json(folders))
}

async fn get_folder(
	State(state): State<AppState>,
	FolderId(id): FolderId,
) -> Result<Json<Folder>, ApiError> {
	let folder = state.service.get_folder(id).await?;

	Ok(Json(folder))
}

async fn create_folder(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<NewFolder>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
	let folder = state.service.create_folder(payload).await?;

	Ok((StatusCode::CREATED, Json(folder)))
}

async fn update_folder(
	State(state): State<AppState>,
	FolderId(id): FolderId,
	ApiJson(payload): ApiJson<FolderPatch>,
) -> Result<Json<Folder>, ApiError> {
	let folder = state.service.update_folder(id, payload).await?;

	Ok(Json(folder))
}

async fn delete_folder(
	State(state): State<AppState>,
	FolderId(id): FolderId,
) -> Result<StatusCode, ApiError> {
	state.service.delete_folder(id).await?;

	Ok(StatusCode::NO_CONTENT)
}

/// JSON body whose rejections use the API error shape.
pub struct ApiJson<T>(pub T);
impl<S, T> FromRequest<S> for ApiJson<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state).await.map_err(json_rejection)?;

		Ok(Self(value))
	}
}

/// Query string whose rejections use the API error shape.
pub struct ApiQuery<T>(pub T);
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Query(value) = Query::<T>::from_request_parts(parts, state)
			.await
			.map_err(|rejection| invalid_request(rejection.body_text()))?;

		Ok(Self(value))
	}
}

pub struct NoteId(pub i64);
impl<S> FromRequestParts<S> for NoteId
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		path_id(parts, state, "Invalid note ID.").await.map(Self)
	}
}

pub struct FolderId(pub i64);
impl<S> FromRequestParts<S> for FolderId
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		path_id(parts, state, "Invalid folder ID.").await.map(Self)
	}
}

async fn path_id<S>(parts: &mut Parts, state: &S, invalid: &str) -> Result<i64, ApiError>
where
	S: Send + Sync,
{
	let Path(raw) = Path::<String>::from_request_parts(parts, state)
		.await
		.map_err(|_| invalid_request(invalid))?;

	raw.trim().parse().map_err(|_| invalid_request(invalid))
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
	invalid_request(rejection.body_text())
}

fn invalid_request(message: impl Into<String>) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => invalid_request(message),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::ProtectedFolder { message } =>
				json_error(StatusCode::NOT_FOUND, "folder_protected", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Request failed in the storage layer.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
