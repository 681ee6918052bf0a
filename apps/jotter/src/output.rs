//! Tab-separated listings for the terminal.

use time::format_description::well_known::Rfc3339;

use jotter_storage::{Folder, Note};

/// One `id<TAB>updatedAt<TAB>title` line per note.
pub fn note_rows(notes: &[Note]) -> Result<String, time::error::Format> {
	let mut out = String::new();

	for note in notes {
		let updated_at = note.updated_at.format(&Rfc3339)?;

		out.push_str(&format!("{}\t{updated_at}\t{}\n", note.id, note.title));
	}

	Ok(out)
}

/// One `id<TAB>name` line per folder.
pub fn folder_rows(folders: &[Folder]) -> String {
	folders.iter().map(|folder| format!("{}\t{}\n", folder.id, folder.name)).collect()
}
