//! Structured rich-text content.
//!
//! Notes store their body as a JSON-encoded node tree produced by the editing engine. This module
//! owns the typed view of that tree, its validation rules, and the lossy plain-text rendering used
//! by search previews and exports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
	Doc,
	Paragraph,
	Heading,
	Text,
	BulletList,
	OrderedList,
	ListItem,
	Table,
	TableRow,
	TableHeader,
	TableCell,
	Image,
	Blockquote,
	CodeBlock,
	HorizontalRule,
	HardBreak,
	/// Node types produced by editor extensions this crate does not model. Kept verbatim so a
	/// load/save cycle never drops them.
	Other(String),
}
impl NodeType {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Doc => "doc",
			Self::Paragraph => "paragraph",
			Self::Heading => "heading",
			Self::Text => "text",
			Self::BulletList => "bulletList",
			Self::OrderedList => "orderedList",
			Self::ListItem => "listItem",
			Self::Table => "table",
			Self::TableRow => "tableRow",
			Self::TableHeader => "tableHeader",
			Self::TableCell => "tableCell",
			Self::Image => "image",
			Self::Blockquote => "blockquote",
			Self::CodeBlock => "codeBlock",
			Self::HorizontalRule => "horizontalRule",
			Self::HardBreak => "hardBreak",
			Self::Other(name) => name,
		}
	}
}
impl From<String> for NodeType {
	fn from(value: String) -> Self {
		match value.as_str() {
			"doc" => Self::Doc,
			"paragraph" => Self::Paragraph,
			"heading" => Self::Heading,
			"text" => Self::Text,
			"bulletList" => Self::BulletList,
			"orderedList" => Self::OrderedList,
			"listItem" => Self::ListItem,
			"table" => Self::Table,
			"tableRow" => Self::TableRow,
			"tableHeader" => Self::TableHeader,
			"tableCell" => Self::TableCell,
			"image" => Self::Image,
			"blockquote" => Self::Blockquote,
			"codeBlock" => Self::CodeBlock,
			"horizontalRule" => Self::HorizontalRule,
			"hardBreak" => Self::HardBreak,
			_ => Self::Other(value),
		}
	}
}
impl From<NodeType> for String {
	fn from(value: NodeType) -> Self {
		match value {
			NodeType::Other(name) => name,
			other => other.as_str().to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkType {
	Bold,
	Italic,
	Underline,
	Strike,
	Code,
	Link,
	Highlight,
	Other(String),
}
impl MarkType {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Bold => "bold",
			Self::Italic => "italic",
			Self::Underline => "underline",
			Self::Strike => "strike",
			Self::Code => "code",
			Self::Link => "link",
			Self::Highlight => "highlight",
			Self::Other(name) => name,
		}
	}
}
impl From<String> for MarkType {
	fn from(value: String) -> Self {
		match value.as_str() {
			"bold" => Self::Bold,
			"italic" => Self::Italic,
			"underline" => Self::Underline,
			"strike" => Self::Strike,
			"code" => Self::Code,
			"link" => Self::Link,
			"highlight" => Self::Highlight,
			_ => Self::Other(value),
		}
	}
}
impl From<MarkType> for String {
	fn from(value: MarkType) -> Self {
		match value {
			MarkType::Other(name) => name,
			other => other.as_str().to_string(),
		}
	}
}

/// Inline formatting attached to a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
	#[serde(rename = "type")]
	pub mark_type: MarkType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attrs: Option<Map<String, Value>>,
}
impl Mark {
	pub fn new(mark_type: MarkType) -> Self {
		Self { mark_type, attrs: None }
	}

	pub fn link(href: impl Into<String>) -> Self {
		let mut attrs = Map::new();

		attrs.insert("href".to_string(), Value::String(href.into()));

		Self { mark_type: MarkType::Link, attrs: Some(attrs) }
	}

	pub fn href(&self) -> Option<&str> {
		self.attrs.as_ref()?.get("href")?.as_str()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
	#[serde(rename = "type")]
	pub node_type: NodeType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attrs: Option<Map<String, Value>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<Vec<Node>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub marks: Option<Vec<Mark>>,
}
impl Node {
	pub fn container(node_type: NodeType, content: Vec<Node>) -> Self {
		Self { node_type, attrs: None, content: Some(content), text: None, marks: None }
	}

	pub fn text(text: impl Into<String>) -> Self {
		Self {
			node_type: NodeType::Text,
			attrs: None,
			content: None,
			text: Some(text.into()),
			marks: None,
		}
	}

	pub fn text_with_marks(text: impl Into<String>, marks: Vec<Mark>) -> Self {
		Self { marks: (!marks.is_empty()).then_some(marks), ..Self::text(text) }
	}

	/// A paragraph; an empty `content` list is stored as an absent one, the way the editor emits
	/// empty paragraphs.
	pub fn paragraph(content: Vec<Node>) -> Self {
		Self {
			node_type: NodeType::Paragraph,
			attrs: None,
			content: (!content.is_empty()).then_some(content),
			text: None,
			marks: None,
		}
	}

	pub fn heading(level: u8, content: Vec<Node>) -> Self {
		Self::container(NodeType::Heading, content).with_attr("level", Value::from(level))
	}

	pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
		Self { node_type: NodeType::Image, attrs: None, content: None, text: None, marks: None }
			.with_attr("src", Value::String(src.into()))
			.with_attr("alt", Value::String(alt.into()))
	}

	/// A `rows` x `cols` table of empty cells; the first row uses header cells when requested.
	pub fn table(rows: usize, cols: usize, with_header_row: bool) -> Self {
		let rows = (0..rows)
			.map(|row| {
				let cell_type = if row == 0 && with_header_row {
					NodeType::TableHeader
				} else {
					NodeType::TableCell
				};
				let cells = (0..cols)
					.map(|_| Node::container(cell_type.clone(), vec![Node::paragraph(Vec::new())]))
					.collect();

				Node::container(NodeType::TableRow, cells)
			})
			.collect();

		Node::container(NodeType::Table, rows)
	}

	pub fn with_attr(mut self, key: &str, value: Value) -> Self {
		self.attrs.get_or_insert_with(Map::new).insert(key.to_string(), value);

		self
	}

	pub fn attr(&self, key: &str) -> Option<&Value> {
		self.attrs.as_ref()?.get(key)
	}

	pub fn children(&self) -> &[Node] {
		self.content.as_deref().unwrap_or(&[])
	}

	pub fn has_mark(&self, mark_type: &MarkType) -> bool {
		self.marks.as_ref().is_some_and(|marks| marks.iter().any(|mark| &mark.mark_type == mark_type))
	}
}

/// A validated document tree whose root is always a `doc` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub struct Document {
	root: Node,
}
impl Document {
	/// A document holding one empty paragraph. This is what the editor is initialized with when
	/// stored content is missing or unusable.
	pub fn empty() -> Self {
		Self { root: Node::container(NodeType::Doc, vec![Node::paragraph(Vec::new())]) }
	}

	pub fn from_blocks(blocks: Vec<Node>) -> Result<Self> {
		Self::try_from(Node::container(NodeType::Doc, blocks))
	}

	/// Parses stored content, rejecting malformed JSON and trees that break the node invariants.
	pub fn parse(raw: &str) -> Result<Self> {
		let root: Node = serde_json::from_str(raw)?;

		Self::try_from(root)
	}

	/// Parses stored content, falling back to [`Document::empty`] instead of failing.
	pub fn load(raw: Option<&str>) -> Self {
		let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
			return Self::empty();
		};

		match Self::parse(raw) {
			Ok(document) => document,
			Err(err) => {
				tracing::warn!(error = %err, "Stored note content is unusable; starting from an empty document.");

				Self::empty()
			},
		}
	}

	pub fn root(&self) -> &Node {
		&self.root
	}

	pub fn blocks(&self) -> &[Node] {
		self.root.children()
	}

	pub fn to_json_string(&self) -> Result<String> {
		Ok(serde_json::to_string(&self.root)?)
	}

	pub fn is_blank(&self) -> bool {
		self.plain_text().is_empty() && !self.contains_node(&NodeType::Image)
	}

	pub fn contains_mark(&self, mark_type: &MarkType) -> bool {
		any_node(&self.root, &|node| node.has_mark(mark_type))
	}

	pub fn contains_node(&self, node_type: &NodeType) -> bool {
		any_node(&self.root, &|node| &node.node_type == node_type)
	}

	pub fn word_count(&self) -> usize {
		self.plain_text().split_whitespace().count()
	}

	/// Depth-first text rendering with block separators. Whitespace is normalized and formatting
	/// is dropped, so the result cannot be turned back into the same tree.
	pub fn plain_text(&self) -> String {
		let mut raw = String::new();

		for block in self.blocks() {
			push_plain_text(block, &NodeType::Doc, &mut raw);
		}

		normalize_whitespace(&raw)
	}
}
impl TryFrom<Node> for Document {
	type Error = Error;

	fn try_from(root: Node) -> Result<Self> {
		if root.node_type != NodeType::Doc {
			return Err(Error::InvalidRoot { found: root.node_type.as_str().to_string() });
		}

		validate_node(&root, "doc")?;

		Ok(Self { root })
	}
}
impl From<Document> for Node {
	fn from(value: Document) -> Self {
		value.root
	}
}
impl Default for Document {
	fn default() -> Self {
		Self::empty()
	}
}

fn validate_node(node: &Node, path: &str) -> Result<()> {
	let invalid = |message: &str| Error::InvalidNode {
		node_type: node.node_type.as_str().to_string(),
		path: path.to_string(),
		message: message.to_string(),
	};

	match node.node_type {
		NodeType::Text => {
			if node.text.is_none() {
				return Err(invalid("text nodes must carry text"));
			}
			if node.content.is_some() {
				return Err(invalid("text nodes cannot have children"));
			}
		},
		NodeType::Doc if path != "doc" => return Err(invalid("doc nodes may only appear at the root")),
		_ => {
			if node.text.is_some() {
				return Err(invalid("only text nodes may carry text"));
			}
		},
	}

	for (index, child) in node.children().iter().enumerate() {
		validate_node(child, &format!("{path}.content[{index}]"))?;
	}

	Ok(())
}

fn any_node(node: &Node, predicate: &dyn Fn(&Node) -> bool) -> bool {
	predicate(node) || node.children().iter().any(|child| any_node(child, predicate))
}

fn push_plain_text(node: &Node, parent: &NodeType, out: &mut String) {
	if let Some(text) = node.text.as_deref() {
		out.push_str(text);
	}
	if node.node_type == NodeType::HardBreak {
		out.push('\n');
	}

	for child in node.children() {
		push_plain_text(child, &node.node_type, out);
	}

	let nested_in_item =
		matches!(parent, NodeType::ListItem | NodeType::TableCell | NodeType::TableHeader);

	match node.node_type {
		NodeType::Paragraph | NodeType::Heading if nested_in_item => {},
		NodeType::Paragraph
		| NodeType::Heading
		| NodeType::BulletList
		| NodeType::OrderedList
		| NodeType::Blockquote
		| NodeType::CodeBlock
		| NodeType::Table => out.push_str("\n\n"),
		NodeType::ListItem | NodeType::TableRow => out.push('\n'),
		NodeType::TableCell | NodeType::TableHeader => out.push('\t'),
		_ => {},
	}
}

fn normalize_whitespace(raw: &str) -> String {
	let mut lines: Vec<String> = Vec::new();

	for line in raw.lines() {
		let line = line.split_whitespace().collect::<Vec<_>>().join(" ");

		if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
			continue;
		}

		lines.push(line);
	}

	while lines.last().is_some_and(|last| last.is_empty()) {
		lines.pop();
	}

	lines.join("\n")
}
