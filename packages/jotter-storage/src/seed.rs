use serde_json::{Value, json};

use crate::models::{NewFolder, NewNote};

pub(crate) const SAMPLE_NOTE_TITLE: &str = "Python - Notes and Packages";

pub(crate) fn all_notes_folder() -> NewFolder {
	folder("All Notes", "folder-open", 0)
}

pub(crate) fn sample_folders() -> Vec<NewFolder> {
	vec![folder("Work", "folder", 1), folder("Personal", "folder", 2), folder("Projects", "folder", 3)]
}

pub(crate) fn sample_note(folder_id: i64) -> NewNote {
	let packages = [
		("BeautifulSoup", " - HTML parsing and web scraping"),
		("Pandas", " - Data analysis and manipulation"),
		("Matplotlib", " - Data visualization and plotting"),
		("Flask", " - Lightweight web framework"),
		("NumPy", " - Scientific computing and arrays"),
		("Django", " - Full-featured web framework"),
	];
	let items: Vec<Value> = packages
		.iter()
		.map(|(name, summary)| {
			json!({
				"type": "listItem",
				"content": [{
					"type": "paragraph",
					"content": [
						{ "type": "text", "text": name, "marks": [{ "type": "bold" }] },
						{ "type": "text", "text": summary }
					]
				}]
			})
		})
		.collect();
	let document = json!({
		"type": "doc",
		"content": [
			heading(1, "Python Development Resources"),
			heading(2, "Essential Python Packages"),
			{ "type": "bulletList", "content": items }
		]
	});

	NewNote {
		title: SAMPLE_NOTE_TITLE.to_string(),
		content: Some(document.to_string()),
		tags: Some(vec!["python".to_string(), "programming".to_string(), "libraries".to_string()]),
		folder_id,
	}
}

fn folder(name: &str, icon: &str, sort_order: i64) -> NewFolder {
	NewFolder { name: name.to_string(), icon: Some(icon.to_string()), sort_order: Some(sort_order) }
}

fn heading(level: u8, text: &str) -> Value {
	json!({
		"type": "heading",
		"attrs": { "level": level },
		"content": [{ "type": "text", "text": text }]
	})
}
