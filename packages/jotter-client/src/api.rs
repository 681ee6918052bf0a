use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;

use jotter_service::NoteQuery;
use jotter_storage::{BoxFuture, Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch};

use crate::{Error, Result};

/// Every endpoint of the note server.
pub trait NoteApi
where
	Self: Send + Sync,
{
	fn list_notes<'a>(&'a self, query: &'a NoteQuery) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn list_notes_by_folder<'a>(
		&'a self,
		folder_id: i64,
		query: &'a NoteQuery,
	) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn search_notes<'a>(
		&'a self,
		text: &'a str,
		query: &'a NoteQuery,
	) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn get_note(&self, id: i64) -> BoxFuture<'_, Result<Note>>;

	fn create_note(&self, note: NewNote) -> BoxFuture<'_, Result<Note>>;

	fn update_note(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Note>>;

	fn delete_note(&self, id: i64) -> BoxFuture<'_, Result<()>>;

	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>>;

	fn get_folder(&self, id: i64) -> BoxFuture<'_, Result<Folder>>;

	fn create_folder(&self, folder: NewFolder) -> BoxFuture<'_, Result<Folder>>;

	fn update_folder(&self, id: i64, patch: FolderPatch) -> BoxFuture<'_, Result<Folder>>;

	fn delete_folder(&self, id: i64) -> BoxFuture<'_, Result<()>>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

/// [`NoteApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
	http: Client,
	base: Url,
}
impl HttpApi {
	pub fn new(cfg: &jotter_config::Client) -> Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Self::with_client(http, &cfg.api_base)
	}

	pub fn with_client(http: Client, api_base: &str) -> Result<Self> {
		let base = Url::parse(&format!("{}/", api_base.trim_end_matches('/')))?;

		Ok(Self { http, base })
	}

	pub fn base(&self) -> &Url {
		&self.base
	}

	fn url(&self, path: &str) -> Result<Url> {
		Ok(self.base.join(path)?)
	}

	async fn fetch<T>(&self, request: RequestBuilder) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = checked(request.send().await?).await?;

		Ok(response.json().await?)
	}

	async fn execute(&self, request: RequestBuilder) -> Result<()> {
		checked(request.send().await?).await?;

		Ok(())
	}
}
impl NoteApi for HttpApi {
	fn list_notes<'a>(&'a self, query: &'a NoteQuery) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move {
			let url = self.url("api/notes")?;

			self.fetch(self.http.get(url).query(query)).await
		})
	}

	fn list_notes_by_folder<'a>(
		&'a self,
		folder_id: i64,
		query: &'a NoteQuery,
	) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move {
			let url = self.url(&format!("api/notes/folder/{folder_id}"))?;

			self.fetch(self.http.get(url).query(query)).await
		})
	}

	fn search_notes<'a>(
		&'a self,
		text: &'a str,
		query: &'a NoteQuery,
	) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move {
			let url = self.url("api/notes/search")?;

			self.fetch(self.http.get(url).query(&[("q", text)]).query(query)).await
		})
	}

	fn get_note(&self, id: i64) -> BoxFuture<'_, Result<Note>> {
		Box::pin(async move {
			let url = self.url(&format!("api/notes/{id}"))?;

			self.fetch(self.http.get(url)).await
		})
	}

	fn create_note(&self, note: NewNote) -> BoxFuture<'_, Result<Note>> {
		Box::pin(async move {
			let url = self.url("api/notes")?;

			self.fetch(self.http.post(url).json(&note)).await
		})
	}

	fn update_note(&self, id: i64, patch: NotePatch) -> BoxFuture<'_, Result<Note>> {
		Box::pin(async move {
			let url = self.url(&format!("api/notes/{id}"))?;

			self.fetch(self.http.put(url).json(&patch)).await
		})
	}

	fn delete_note(&self, id: i64) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let url = self.url(&format!("api/notes/{id}"))?;

			self.execute(self.http.delete(url)).await
		})
	}

	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>> {
		Box::pin(async move {
			let url = self.url("api/folders")?;

			self.fetch(self.http.get(url)).await
		})
	}

	fn get_folder(&self, id: i64) -> BoxFuture<'_, Result<Folder>> {
		Box::pin(async move {
			let url = self.url(&format!("api/folders/{id}"))?;

			self.fetch(self.http.get(url)).await
		})
	}

	fn create_folder(&self, folder: NewFolder) -> BoxFuture<'_, Result<Folder>> {
		Box::pin(async move {
			let url = self.url("api/folders")?;

			self.fetch(self.http.post(url).json(&folder)).await
		})
	}

	fn update_folder(&self, id: i64, patch: FolderPatch) -> BoxFuture<'_, Result<Folder>> {
		Box::pin(async move {
			let url = self.url(&format!("api/folders/{id}"))?;

			self.fetch(self.http.put(url).json(&patch)).await
		})
	}

	fn delete_folder(&self, id: i64) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let url = self.url(&format!("api/folders/{id}"))?;

			self.execute(self.http.delete(url)).await
		})
	}
}

async fn checked(response: Response) -> Result<Response> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	let fallback = status.canonical_reason().unwrap_or("Request failed.").to_string();
	let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
		error_code: "unknown".to_string(),
		message: fallback,
	});

	Err(Error::Api { status: status.as_u16(), error_code: body.error_code, message: body.message })
}
