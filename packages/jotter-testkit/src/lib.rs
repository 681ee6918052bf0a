//! A real note server on an ephemeral loopback port, for client integration tests.

mod error;

pub use error::{Error, Result};

use std::{net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use jotter_api::{routes, state::AppState};
use jotter_storage::{MemoryStore, Repository};

pub struct TestServer {
	addr: SocketAddr,
	shutdown: Option<oneshot::Sender<()>>,
	task: Option<JoinHandle<std::io::Result<()>>>,
}
impl TestServer {
	pub async fn start(seed_sample_data: bool) -> Result<Self> {
		Self::with_repository(Arc::new(MemoryStore::new(seed_sample_data))).await
	}

	pub async fn with_repository(repo: Arc<dyn Repository>) -> Result<Self> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let app = routes::router(AppState::from_repository(repo));
		let (shutdown, signal) = oneshot::channel::<()>();
		let task = tokio::spawn(async move {
			axum::serve(listener, app)
				.with_graceful_shutdown(async {
					let _ = signal.await;
				})
				.await
		});

		Ok(Self { addr, shutdown: Some(shutdown), task: Some(task) })
	}

	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	pub fn api_base(&self) -> String {
		format!("http://{}", self.addr)
	}

	pub async fn stop(mut self) -> Result<()> {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
		}

		let Some(task) = self.task.take() else {
			return Ok(());
		};

		task.await
			.map_err(|err| Error::Message(format!("Test server task failed: {err}.")))?
			.map_err(Error::from)
	}
}
impl Drop for TestServer {
	fn drop(&mut self) {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
		}
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}
