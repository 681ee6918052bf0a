use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use jotter_storage::Note;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteSort {
	#[default]
	DateDesc,
	DateAsc,
	TitleAsc,
	TitleDesc,
}
impl NoteSort {
	pub const ALL: [Self; 4] = [Self::DateDesc, Self::DateAsc, Self::TitleAsc, Self::TitleDesc];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::DateDesc => "date-desc",
			Self::DateAsc => "date-asc",
			Self::TitleAsc => "title-asc",
			Self::TitleDesc => "title-desc",
		}
	}
}
impl fmt::Display for NoteSort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for NoteSort {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|sort| sort.as_str() == raw).ok_or_else(|| {
			format!("Unknown sort {raw:?}; expected date-desc, date-asc, title-asc, or title-desc.")
		})
	}
}

/// Client-side ordering and tag filter applied on top of the repository order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteQuery {
	#[serde(default)]
	pub sort: NoteSort,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tag: Option<String>,
}
impl NoteQuery {
	pub fn apply(&self, mut notes: Vec<Note>) -> Vec<Note> {
		if let Some(tag) = self.tag.as_deref().map(str::trim).filter(|tag| !tag.is_empty()) {
			let tag = tag.to_lowercase();

			notes.retain(|note| note.tags.iter().flatten().any(|t| t.to_lowercase() == tag));
		}

		match self.sort {
			NoteSort::DateDesc => {},
			NoteSort::DateAsc =>
				notes.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id))),
			NoteSort::TitleAsc => notes.sort_by(compare_titles),
			NoteSort::TitleDesc => notes.sort_by(|a, b| compare_titles(b, a)),
		}

		notes
	}
}

fn compare_titles(a: &Note, b: &Note) -> Ordering {
	a.title.to_lowercase().cmp(&b.title.to_lowercase())
}
