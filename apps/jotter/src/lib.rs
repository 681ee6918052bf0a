//! `jotter`, a terminal client for the note server.

pub mod output;

use std::{
	fs,
	io::{self, Write},
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jotter_client::{HttpApi, NoteApi};
use jotter_domain::{document::Document, export::NoteExport};
use jotter_service::{NoteQuery, NoteSort};

#[derive(Debug, Parser)]
#[command(
	version = jotter_cli::VERSION,
	rename_all = "kebab",
	styles = jotter_cli::styles(),
)]
pub struct Args {
	/// Reads `[client]` from this file instead of using the defaults.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	/// Overrides `client.api_base`.
	#[arg(long, value_name = "URL")]
	pub api_base: Option<String>,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Lists notes, newest first unless `--sort` says otherwise.
	List {
		#[arg(long, value_name = "ID")]
		folder: Option<i64>,
		#[arg(long, default_value_t = NoteSort::DateDesc)]
		sort: NoteSort,
		#[arg(long)]
		tag: Option<String>,
	},
	/// Case-insensitive search over titles, content, and tags.
	Search {
		query: String,
		#[arg(long, default_value_t = NoteSort::DateDesc)]
		sort: NoteSort,
	},
	/// Prints a note as plain text.
	Show { id: i64 },
	/// Writes a note to `<dir>/<title>.txt`.
	Export {
		id: i64,
		#[arg(long, value_name = "DIR", default_value = ".")]
		out: PathBuf,
	},
	/// Lists folders in display order.
	Folders,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let client = client_config(&args)?;

	init_tracing();

	let api = HttpApi::new(&client)?;

	tracing::debug!(api_base = %api.base(), "Client configured.");

	let output = match args.command {
		Command::List { folder, sort, tag } => {
			let query = NoteQuery { sort, tag };
			let notes = match folder {
				Some(folder_id) => api.list_notes_by_folder(folder_id, &query).await?,
				None => api.list_notes(&query).await?,
			};

			output::note_rows(&notes)?
		},
		Command::Search { query, sort } => {
			let notes = api.search_notes(&query, &NoteQuery { sort, tag: None }).await?;

			output::note_rows(&notes)?
		},
		Command::Show { id } => {
			let note = api.get_note(id).await?;
			let document = Document::load(note.content.as_deref());

			format!("{}\n\n{}\n", note.title, document.plain_text())
		},
		Command::Export { id, out } => {
			let path = export_note(&api, id, &out).await?;

			format!("{}\n", path.display())
		},
		Command::Folders => output::folder_rows(&api.list_folders().await?),
	};

	io::stdout().lock().write_all(output.as_bytes())?;

	Ok(())
}

/// Writes note `id` as plain text under `out` and returns the written path.
pub async fn export_note(api: &dyn NoteApi, id: i64, out: &Path) -> color_eyre::Result<PathBuf> {
	let note = api.get_note(id).await?;
	let document = Document::load(note.content.as_deref());
	let export = NoteExport {
		title: &note.title,
		created_at: note.created_at,
		updated_at: note.updated_at,
		document: &document,
	};
	let path = out.join(export.file_name());

	fs::create_dir_all(out)?;
	fs::write(&path, export.render()?)?;

	tracing::info!(note_id = id, path = %path.display(), "Note exported.");

	Ok(path)
}

fn client_config(args: &Args) -> color_eyre::Result<jotter_config::Client> {
	let mut client = match &args.config {
		Some(path) => jotter_config::load(path)?.client,
		None => jotter_config::Client::default(),
	};

	if let Some(api_base) = &args.api_base {
		client.api_base = api_base.trim_end_matches('/').to_string();
	}

	Ok(client)
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn list_flags_parse_into_a_query() {
		let args = Args::try_parse_from([
			"jotter", "list", "--folder", "2", "--sort", "title-asc", "--tag", "work",
		])
		.expect("Arguments are valid.");

		match args.command {
			Command::List { folder, sort, tag } => {
				assert_eq!(folder, Some(2));
				assert_eq!(sort, NoteSort::TitleAsc);
				assert_eq!(tag.as_deref(), Some("work"));
			},
			other => panic!("Unexpected command {other:?}."),
		}
	}

	#[test]
	fn unknown_sort_is_rejected() {
		let err = Args::try_parse_from(["jotter", "list", "--sort", "newest"])
			.expect_err("Sort must be one of the known orders.");

		assert!(err.to_string().contains("date-desc"));
	}

	#[test]
	fn api_base_flag_overrides_the_default() {
		let args = Args::try_parse_from(["jotter", "--api-base", "http://notes.local:9000/", "folders"])
			.expect("Arguments are valid.");
		let client = client_config(&args).expect("No config file to read.");

		assert_eq!(client.api_base, "http://notes.local:9000");
		assert_eq!(client.timeout_ms, jotter_config::Client::default().timeout_ms);
	}

	#[test]
	fn export_defaults_to_the_working_directory() {
		let args = Args::try_parse_from(["jotter", "export", "7"]).expect("Arguments are valid.");

		match args.command {
			Command::Export { id, out } => {
				assert_eq!(id, 7);
				assert_eq!(out, PathBuf::from("."));
			},
			other => panic!("Unexpected command {other:?}."),
		}
	}
}
