use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
	pub id: i64,
	pub title: String,
	/// Serialized document tree, as produced by the editor.
	pub content: Option<String>,
	pub tags: Option<Vec<String>>,
	pub folder_id: i64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl Note {
	pub fn matches(&self, lowered_query: &str) -> bool {
		self.title.to_lowercase().contains(lowered_query)
			|| self
				.content
				.as_deref()
				.is_some_and(|content| content.to_lowercase().contains(lowered_query))
			|| self
				.tags
				.iter()
				.flatten()
				.any(|tag| tag.to_lowercase().contains(lowered_query))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
	pub id: i64,
	pub name: String,
	pub icon: Option<String>,
	pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	pub folder_id: i64,
}

/// Partial note update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub folder_id: Option<i64>,
}
impl NotePatch {
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.content.is_none()
			&& self.tags.is_none()
			&& self.folder_id.is_none()
	}

	/// Folds `newer` into `self`; fields set in `newer` win.
	pub fn merge(&mut self, newer: NotePatch) {
		if newer.title.is_some() {
			self.title = newer.title;
		}
		if newer.content.is_some() {
			self.content = newer.content;
		}
		if newer.tags.is_some() {
			self.tags = newer.tags;
		}
		if newer.folder_id.is_some() {
			self.folder_id = newer.folder_id;
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolder {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sort_order: Option<i64>,
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn notes_use_camel_case_and_rfc3339() {
		let note = Note {
			id: 7,
			title: "Plan".to_string(),
			content: None,
			tags: Some(vec!["work".to_string()]),
			folder_id: 2,
			created_at: datetime!(2024-05-01 8:00 UTC),
			updated_at: datetime!(2024-05-01 8:00:00.5 UTC),
		};
		let value = serde_json::to_value(&note).expect("Failed to serialize note.");

		assert_eq!(value["folderId"], 2);
		assert_eq!(value["content"], serde_json::Value::Null);
		assert_eq!(value["createdAt"], "2024-05-01T08:00:00Z");
		assert_eq!(value["updatedAt"], "2024-05-01T08:00:00.5Z");
	}

	#[test]
	fn later_patch_fields_win() {
		let mut pending = NotePatch { title: Some("a".to_string()), ..NotePatch::default() };

		pending.merge(NotePatch { content: Some("{}".to_string()), ..NotePatch::default() });
		pending.merge(NotePatch { title: Some("b".to_string()), ..NotePatch::default() });

		assert_eq!(pending.title.as_deref(), Some("b"));
		assert_eq!(pending.content.as_deref(), Some("{}"));
		assert!(!pending.is_empty());
	}
}
