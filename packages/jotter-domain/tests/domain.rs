use jotter_domain::{
	document::{Document, Mark, MarkType, Node, NodeType},
	spelling::SpellChecker,
};

fn list_item(text: &str) -> Node {
	Node::container(NodeType::ListItem, vec![Node::paragraph(vec![Node::text(text)])])
}

#[test]
fn load_falls_back_to_an_empty_paragraph() {
	let empty = Document::empty();

	assert_eq!(Document::load(Some("{")), empty);
	assert_eq!(Document::load(Some("{}")), empty);
	assert_eq!(Document::load(Some("   ")), empty);
	assert_eq!(Document::load(None), empty);
	assert_eq!(
		empty.to_json_string().expect("Failed to serialize document."),
		r#"{"type":"doc","content":[{"type":"paragraph"}]}"#
	);
}

#[test]
fn load_rejects_trees_that_break_node_invariants() {
	let text_with_children =
		r#"{"type":"doc","content":[{"type":"text","text":"x","content":[]}]}"#;
	let wrong_root = r#"{"type":"paragraph","content":[]}"#;

	assert!(Document::parse(text_with_children).is_err());
	assert!(Document::parse(wrong_root).is_err());
	assert_eq!(Document::load(Some(text_with_children)), Document::empty());
}

#[test]
fn parse_keeps_marks_and_attributes() {
	let raw = r#"{"type":"doc","content":[{"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Links","marks":[{"type":"link","attrs":{"href":"https://example.com"}}]}]}]}"#;
	let document = Document::parse(raw).expect("Failed to parse document.");
	let text = &document.blocks()[0].children()[0];

	assert!(document.contains_mark(&MarkType::Link));
	assert!(!document.contains_mark(&MarkType::Bold));
	assert_eq!(text.marks.as_ref().and_then(|marks| marks[0].href()), Some("https://example.com"));
	assert_eq!(document.to_json_string().expect("Failed to serialize document."), raw);
}

#[test]
fn plain_text_renders_blocks_lists_and_tables() {
	let mut table = Node::table(2, 2, true);

	for (row_index, row) in table.content.iter_mut().flatten().enumerate() {
		for (col_index, cell) in row.content.iter_mut().flatten().enumerate() {
			cell.content = Some(vec![Node::paragraph(vec![Node::text(format!(
				"r{row_index}c{col_index}"
			))])]);
		}
	}

	let document = Document::from_blocks(vec![
		Node::heading(1, vec![Node::text("Title")]),
		Node::paragraph(vec![
			Node::text("first"),
			Node::container(NodeType::HardBreak, Vec::new()),
			Node::text_with_marks("second   line", vec![Mark::new(MarkType::Bold)]),
		]),
		Node::container(NodeType::OrderedList, vec![list_item("one"), list_item("two")]),
		table,
		Node::paragraph(Vec::new()),
		Node::paragraph(Vec::new()),
	])
	.expect("Failed to build document.");

	assert_eq!(
		document.plain_text(),
		"Title\n\nfirst\nsecond line\n\none\ntwo\n\nr0c0 r0c1\nr1c0 r1c1"
	);
	assert_eq!(document.word_count(), 10);
}

#[test]
fn images_keep_a_document_from_being_blank() {
	let blank = Document::from_blocks(vec![Node::paragraph(Vec::new())])
		.expect("Failed to build document.");
	let picture = Document::from_blocks(vec![Node::image("https://example.com/a.png", "a")])
		.expect("Failed to build document.");

	assert!(blank.is_blank());
	assert!(!picture.is_blank());
	assert!(picture.contains_node(&NodeType::Image));
}

#[test]
fn suggestions_fall_back_to_first_letter_and_edit_distance() {
	let checker = SpellChecker::new(4);

	assert_eq!(checker.suggestions("definately"), vec!["definitely"]);
	assert_eq!(checker.suggestions("rhythmic"), vec!["receive", "restaurant", "rhythm"]);
	assert_eq!(checker.suggestions("zzz").len(), 0);
	assert!(SpellChecker::new(1).suggestions("b").len() <= 1);
}

#[test]
fn find_misspelled_strips_punctuation_and_skips_single_letters() {
	let checker = SpellChecker::default();

	assert_eq!(
		checker.find_misspelled("I will recieve the adress, tommorow! a"),
		vec!["recieve", "adress", "tommorow"]
	);
}
