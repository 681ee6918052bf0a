//! Plain-text export of a note.

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Result, document::Document};

const EXPORT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub struct NoteExport<'a> {
	pub title: &'a str,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub document: &'a Document,
}
impl NoteExport<'_> {
	pub fn render(&self) -> Result<String> {
		let created = self.created_at.format(EXPORT_DATE)?;
		let updated = self.updated_at.format(EXPORT_DATE)?;

		Ok(format!(
			"{}\n\nCreated: {created}\nLast updated: {updated}\n\n{}",
			self.title,
			self.document.plain_text()
		))
	}

	pub fn file_name(&self) -> String {
		file_name(self.title)
	}
}

const UNTITLED_STEM: &str = "untitled";

/// `title` with every char outside ASCII `[A-Za-z0-9]` replaced by `_`, lowercased, plus `.txt`.
pub fn file_name(title: &str) -> String {
	let stem: String = title
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
		.collect();

	if stem.is_empty() {
		return format!("{UNTITLED_STEM}.txt");
	}

	format!("{stem}.txt")
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;
	use crate::document::Node;

	#[test]
	fn renders_header_then_plain_text() {
		let document = Document::from_blocks(vec![
			Node::heading(1, vec![Node::text("Groceries")]),
			Node::paragraph(vec![Node::text("Milk  and   eggs")]),
		])
		.expect("Blocks are valid.");
		let export = NoteExport {
			title: "Weekend",
			created_at: datetime!(2024-03-01 9:30 UTC),
			updated_at: datetime!(2024-03-02 18:00 UTC),
			document: &document,
		};

		assert_eq!(
			export.render().expect("Dates format."),
			"Weekend\n\nCreated: 2024-03-01\nLast updated: 2024-03-02\n\nGroceries\n\nMilk and eggs"
		);
	}

	#[test]
	fn file_name_replaces_everything_outside_ascii_alphanumerics() {
		assert_eq!(file_name("Python - Notes & Packages"), "python___notes___packages.txt");
		assert_eq!(file_name("Café 2"), "caf__2.txt");
	}

	#[test]
	fn file_name_checks_chars_before_lowercasing() {
		assert_eq!(file_name("İstanbul"), "_stanbul.txt");
		assert_eq!(file_name("\u{212A}elvin"), "_elvin.txt");
	}

	#[test]
	fn empty_title_gets_a_visible_file_name() {
		assert_eq!(file_name(""), "untitled.txt");
	}
}
