//! Context-sensitive editor menu.
//!
//! A menu is assembled from a [`MenuRequest`]: every entry lists the context tags it shows in,
//! entries outside the active tag are filtered out, and sections left without an actionable
//! entry are dropped. Activating an item runs it against an explicit [`EditorCommands`] instance
//! and closes the menu, except for items that need more input (link and image dialogs), which
//! keep the menu alive until the dialog is resolved or cancelled.

pub mod cursor;

pub use cursor::{
	BlockKind, ContextTag, CursorContext, DEFAULT_WORD_SCAN_WINDOW, MenuRequest, WordMatch,
	classify, spell_target, word_at,
};

use std::ops::Range;

use url::{Url, form_urlencoded};

use crate::{
	Error, Result,
	document::{Mark, MarkType, Node},
	spelling::SpellChecker,
};

const SPELLING_MENU_LIMIT: usize = 4;
const DEFAULT_IMAGE_ALT: &str = "image";

const EDITABLE: &[ContextTag] = &[ContextTag::Text, ContextTag::NoteBody];
const EDITABLE_AND_HEADER: &[ContextTag] =
	&[ContextTag::Text, ContextTag::NoteBody, ContextTag::Header];
const CUT_CONTEXTS: &[ContextTag] =
	&[ContextTag::Text, ContextTag::NoteBody, ContextTag::Header, ContextTag::Image];
const COPY_CONTEXTS: &[ContextTag] = &[
	ContextTag::Text,
	ContextTag::NoteBody,
	ContextTag::Header,
	ContextTag::Image,
	ContextTag::Link,
];
const ALIGN_CONTEXTS: &[ContextTag] = &[ContextTag::Text, ContextTag::NoteBody, ContextTag::Image];
const TEXT_ONLY: &[ContextTag] = &[ContextTag::Text];
const IMAGE_ONLY: &[ContextTag] = &[ContextTag::Image];
const LINK_ONLY: &[ContextTag] = &[ContextTag::Link];

/// The command surface of the editing engine the menu drives.
pub trait EditorCommands {
	fn can_toggle(&self, mark: &MarkType) -> bool;

	fn toggle_mark(&mut self, mark: MarkType);

	fn set_block(&mut self, format: BlockFormat);

	fn toggle_list(&mut self, list: ListKind);

	fn set_alignment(&mut self, alignment: Alignment);

	/// Inserts nodes at the cursor, replacing any selection.
	fn insert_content(&mut self, nodes: Vec<Node>);

	/// Replaces the char range of the current block with plain text.
	fn replace_range(&mut self, range: Range<usize>, text: &str);

	/// Applies a link mark to the current selection.
	fn set_link(&mut self, href: &str);

	fn cut(&mut self);

	fn copy(&mut self);

	fn paste(&mut self);

	fn copy_text(&mut self, text: &str);

	fn search_notes(&mut self, query: &str);

	fn open_external(&mut self, url: &str);

	fn save_image(&mut self, src: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
	Paragraph,
	Heading(u8),
	CodeBlock,
	Blockquote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
	Bullet,
	Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
	Left,
	Center,
	Right,
	Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
	Google,
	Bing,
}
impl SearchEngine {
	fn base_url(self) -> &'static str {
		match self {
			Self::Google => "https://www.google.com/search",
			Self::Bing => "https://www.bing.com/search",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	ReplaceWord { range: Range<usize>, replacement: String },
	AddToDictionary(String),
	Cut,
	Copy,
	Paste,
	ToggleMark(MarkType),
	SetBlock(BlockFormat),
	ToggleList(ListKind),
	Align(Alignment),
	InsertLink,
	InsertImage,
	InsertTable { rows: usize, cols: usize, with_header_row: bool },
	SearchNotes(String),
	SearchWeb { engine: SearchEngine, term: String },
	ReplaceImage,
	SaveImage(String),
	OpenLink(String),
	EditLink,
	CopyLinkAddress(String),
}
impl Action {
	/// The dialog this action needs before it can touch the editor, if any.
	pub fn dialog(&self) -> Option<DialogKind> {
		match self {
			Self::InsertLink | Self::EditLink => Some(DialogKind::Link),
			Self::InsertImage | Self::ReplaceImage => Some(DialogKind::Image),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
	Link,
	Image,
}
impl DialogKind {
	fn as_str(self) -> &'static str {
		match self {
			Self::Link => "link",
			Self::Image => "image",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogInput {
	Link { url: String, text: Option<String> },
	Image { src: String, alt: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
	pub id: String,
	pub label: String,
	pub shortcut: Option<&'static str>,
	pub action: Action,
	pub disabled: bool,
	/// `None` shows the item in every context.
	pub contexts: Option<&'static [ContextTag]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
	Item(MenuItem),
	Submenu {
		id: String,
		label: String,
		items: Vec<MenuItem>,
		contexts: Option<&'static [ContextTag]>,
	},
	Divider {
		id: String,
		contexts: Option<&'static [ContextTag]>,
	},
}
impl MenuEntry {
	pub fn id(&self) -> &str {
		match self {
			Self::Item(item) => &item.id,
			Self::Submenu { id, .. } | Self::Divider { id, .. } => id,
		}
	}

	pub fn is_divider(&self) -> bool {
		matches!(self, Self::Divider { .. })
	}

	fn contexts(&self) -> Option<&'static [ContextTag]> {
		match self {
			Self::Item(item) => item.contexts,
			Self::Submenu { contexts, .. } | Self::Divider { contexts, .. } => *contexts,
		}
	}

	fn visible_in(&self, tag: ContextTag) -> bool {
		self.contexts().is_none_or(|contexts| contexts.contains(&tag))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
	pub id: &'static str,
	pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
	Open,
	AwaitingDialog(DialogKind),
	Closed,
}
impl MenuState {
	fn as_str(&self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::AwaitingDialog(_) => "waiting on a dialog",
			Self::Closed => "closed",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
	Closed,
	AwaitingDialog(DialogKind),
}

#[derive(Debug, Clone)]
pub struct ContextMenu {
	request: MenuRequest,
	sections: Vec<MenuSection>,
	state: MenuState,
}
impl ContextMenu {
	pub fn open(request: MenuRequest, editor: &dyn EditorCommands) -> Self {
		let sections = build_menu(&request, editor);

		Self { request, sections, state: MenuState::Open }
	}

	pub fn request(&self) -> &MenuRequest {
		&self.request
	}

	pub fn tag(&self) -> ContextTag {
		self.request.tag
	}

	pub fn sections(&self) -> &[MenuSection] {
		&self.sections
	}

	pub fn state(&self) -> &MenuState {
		&self.state
	}

	pub fn is_open(&self) -> bool {
		self.state != MenuState::Closed
	}

	/// Finds an actionable item by id, including items nested in submenus.
	pub fn item(&self, id: &str) -> Option<&MenuItem> {
		self.sections.iter().flat_map(|section| &section.entries).find_map(|entry| match entry {
			MenuEntry::Item(item) if item.id == id => Some(item),
			MenuEntry::Submenu { items, .. } => items.iter().find(|item| item.id == id),
			_ => None,
		})
	}

	pub fn activate(
		&mut self,
		id: &str,
		editor: &mut dyn EditorCommands,
		checker: &mut SpellChecker,
	) -> Result<MenuOutcome> {
		if self.state != MenuState::Open {
			return Err(Error::MenuState { state: self.state.as_str(), operation: "activate" });
		}

		let item = self.item(id).ok_or_else(|| Error::UnknownMenuItem { id: id.to_string() })?;

		if item.disabled {
			return Err(Error::DisabledMenuItem { id: id.to_string() });
		}

		let action = item.action.clone();

		if let Some(kind) = action.dialog() {
			tracing::debug!(item = id, dialog = kind.as_str(), "Context menu waiting on dialog.");

			self.state = MenuState::AwaitingDialog(kind);

			return Ok(MenuOutcome::AwaitingDialog(kind));
		}

		run_action(action, editor, checker);

		self.state = MenuState::Closed;

		Ok(MenuOutcome::Closed)
	}

	pub fn resolve_dialog(
		&mut self,
		input: DialogInput,
		editor: &mut dyn EditorCommands,
	) -> Result<()> {
		let MenuState::AwaitingDialog(kind) = self.state else {
			return Err(Error::MenuState { state: self.state.as_str(), operation: "resolve_dialog" });
		};

		match (kind, input) {
			(DialogKind::Link, DialogInput::Link { url, text }) => {
				let text = text.filter(|text| !text.is_empty());

				match text {
					Some(text) if self.request.selected_text.is_empty() => {
						let link = Node::text_with_marks(text, vec![Mark::link(url)]);

						editor.insert_content(vec![link]);
					},
					_ => editor.set_link(&url),
				}
			},
			(DialogKind::Image, DialogInput::Image { src, alt }) => {
				let alt = alt
					.filter(|alt| !alt.is_empty())
					.unwrap_or_else(|| DEFAULT_IMAGE_ALT.to_string());

				editor.insert_content(vec![Node::image(src, alt)]);
			},
			(kind, _) => return Err(Error::DialogMismatch { expected: kind.as_str() }),
		}

		self.state = MenuState::Closed;

		Ok(())
	}

	pub fn cancel_dialog(&mut self) -> Result<()> {
		if !matches!(self.state, MenuState::AwaitingDialog(_)) {
			return Err(Error::MenuState { state: self.state.as_str(), operation: "cancel_dialog" });
		}

		self.state = MenuState::Closed;

		Ok(())
	}

	pub fn close(&mut self) {
		self.state = MenuState::Closed;
	}
}

/// Ordered sections for `request`, already filtered by its context tag.
pub fn build_menu(request: &MenuRequest, editor: &dyn EditorCommands) -> Vec<MenuSection> {
	let tag = request.tag;
	let mut sections = Vec::new();

	if let Some(section) = spelling_section(request) {
		sections.push(section);
	}

	sections.push(selection_section(request));
	sections.push(formatting_section(editor));
	sections.push(paragraph_section());
	sections.push(alignment_section());
	sections.push(insert_section());
	sections.push(search_section(request));

	if tag == ContextTag::Image {
		sections.push(image_section(request));
	}
	if tag == ContextTag::Link {
		sections.push(link_section(request));
	}

	sections
		.into_iter()
		.filter_map(|mut section| {
			section.entries.retain(|entry| entry.visible_in(tag));

			section.entries.iter().any(|entry| !entry.is_divider()).then_some(section)
		})
		.collect()
}

fn run_action(action: Action, editor: &mut dyn EditorCommands, checker: &mut SpellChecker) {
	match action {
		Action::ReplaceWord { range, replacement } => editor.replace_range(range, &replacement),
		Action::AddToDictionary(word) => {
			checker.add_to_dictionary(&word);
		},
		Action::Cut => editor.cut(),
		Action::Copy => editor.copy(),
		Action::Paste => editor.paste(),
		Action::ToggleMark(mark) => editor.toggle_mark(mark),
		Action::SetBlock(format) => editor.set_block(format),
		Action::ToggleList(list) => editor.toggle_list(list),
		Action::Align(alignment) => editor.set_alignment(alignment),
		Action::InsertTable { rows, cols, with_header_row } =>
			editor.insert_content(vec![Node::table(rows, cols, with_header_row)]),
		Action::SearchNotes(query) => editor.search_notes(&query),
		Action::SearchWeb { engine, term } => match web_search_url(engine, &term) {
			Ok(url) => editor.open_external(url.as_str()),
			Err(err) => tracing::warn!(error = %err, "Failed to build web search URL."),
		},
		Action::SaveImage(src) => editor.save_image(&src),
		Action::OpenLink(href) => editor.open_external(&href),
		Action::CopyLinkAddress(href) => editor.copy_text(&href),
		Action::InsertLink | Action::EditLink | Action::InsertImage | Action::ReplaceImage => {},
	}
}

/// Search URL for `term`, percent-encoded with spaces as `%20`.
pub fn web_search_url(
	engine: SearchEngine,
	term: &str,
) -> std::result::Result<Url, url::ParseError> {
	// Form encoding writes spaces as `+` and a literal `+` as `%2B`.
	let query = form_urlencoded::byte_serialize(term.as_bytes())
		.collect::<String>()
		.replace('+', "%20");

	Url::parse(&format!("{}?q={query}", engine.base_url()))
}

fn item(id: &str, label: &str, action: Action) -> MenuItem {
	MenuItem {
		id: id.to_string(),
		label: label.to_string(),
		shortcut: None,
		action,
		disabled: false,
		contexts: None,
	}
}

impl MenuItem {
	fn shortcut(mut self, shortcut: &'static str) -> Self {
		self.shortcut = Some(shortcut);

		self
	}

	fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;

		self
	}

	fn contexts(mut self, contexts: &'static [ContextTag]) -> Self {
		self.contexts = Some(contexts);

		self
	}
}

fn divider(id: &str, contexts: Option<&'static [ContextTag]>) -> MenuEntry {
	MenuEntry::Divider { id: id.to_string(), contexts }
}

fn spelling_section(request: &MenuRequest) -> Option<MenuSection> {
	let target = request.target.as_ref()?;

	if !request.misspelled || request.suggestions.is_empty() {
		return None;
	}

	let mut entries: Vec<MenuEntry> = request
		.suggestions
		.iter()
		.take(SPELLING_MENU_LIMIT)
		.enumerate()
		.map(|(index, suggestion)| {
			MenuEntry::Item(item(
				&format!("spelling-{index}"),
				suggestion,
				Action::ReplaceWord { range: target.range.clone(), replacement: suggestion.clone() },
			))
		})
		.collect();

	entries.push(MenuEntry::Item(
		item("add-to-dictionary", "Add to dictionary", Action::AddToDictionary(target.word.clone()))
			.contexts(TEXT_ONLY),
	));
	entries.push(divider("spelling-divider", None));

	Some(MenuSection { id: "spelling", entries })
}

fn selection_section(request: &MenuRequest) -> MenuSection {
	let nothing_selected = request.selected_text.is_empty();
	let tag = request.tag;

	MenuSection {
		id: "selection",
		entries: vec![
			MenuEntry::Item(
				item("cut", "Cut", Action::Cut)
					.shortcut("Ctrl+X")
					.disabled(nothing_selected && tag != ContextTag::Image)
					.contexts(CUT_CONTEXTS),
			),
			MenuEntry::Item(
				item("copy", "Copy", Action::Copy)
					.shortcut("Ctrl+C")
					.disabled(
						nothing_selected && tag != ContextTag::Image && tag != ContextTag::Link,
					)
					.contexts(COPY_CONTEXTS),
			),
			MenuEntry::Item(
				item("paste", "Paste", Action::Paste)
					.shortcut("Ctrl+V")
					.contexts(EDITABLE_AND_HEADER),
			),
			divider("selection-divider", None),
		],
	}
}

fn formatting_section(editor: &dyn EditorCommands) -> MenuSection {
	let mark_item = |id: &str, label: &str, shortcut: &'static str, mark: MarkType| {
		let disabled = !editor.can_toggle(&mark);

		MenuEntry::Item(
			item(id, label, Action::ToggleMark(mark))
				.shortcut(shortcut)
				.disabled(disabled)
				.contexts(EDITABLE),
		)
	};

	MenuSection {
		id: "formatting",
		entries: vec![
			mark_item("bold", "Bold", "Ctrl+B", MarkType::Bold),
			mark_item("italic", "Italic", "Ctrl+I", MarkType::Italic),
			mark_item("underline", "Underline", "Ctrl+U", MarkType::Underline),
			divider("formatting-divider", Some(EDITABLE)),
		],
	}
}

fn paragraph_section() -> MenuSection {
	let formats = vec![
		item("paragraph", "Paragraph", Action::SetBlock(BlockFormat::Paragraph)),
		item("heading1", "Heading 1", Action::SetBlock(BlockFormat::Heading(1))),
		item("heading2", "Heading 2", Action::SetBlock(BlockFormat::Heading(2))),
		item("heading3", "Heading 3", Action::SetBlock(BlockFormat::Heading(3))),
		item("code-block", "Code Block", Action::SetBlock(BlockFormat::CodeBlock)),
		item("blockquote", "Quote", Action::SetBlock(BlockFormat::Blockquote)),
	];

	MenuSection {
		id: "paragraph",
		entries: vec![
			MenuEntry::Submenu {
				id: "paragraph-format".to_string(),
				label: "Format".to_string(),
				items: formats,
				contexts: Some(EDITABLE),
			},
			MenuEntry::Item(
				item("bullet-list", "Bullet List", Action::ToggleList(ListKind::Bullet))
					.contexts(EDITABLE),
			),
			MenuEntry::Item(
				item("numbered-list", "Numbered List", Action::ToggleList(ListKind::Ordered))
					.contexts(EDITABLE),
			),
			divider("paragraph-divider", Some(EDITABLE)),
		],
	}
}

fn alignment_section() -> MenuSection {
	MenuSection {
		id: "alignment",
		entries: vec![
			MenuEntry::Item(
				item("align-left", "Align Left", Action::Align(Alignment::Left))
					.contexts(ALIGN_CONTEXTS),
			),
			MenuEntry::Item(
				item("align-center", "Align Center", Action::Align(Alignment::Center))
					.contexts(ALIGN_CONTEXTS),
			),
			MenuEntry::Item(
				item("align-right", "Align Right", Action::Align(Alignment::Right))
					.contexts(ALIGN_CONTEXTS),
			),
			MenuEntry::Item(
				item("align-justify", "Justify", Action::Align(Alignment::Justify))
					.contexts(EDITABLE),
			),
			divider("alignment-divider", Some(ALIGN_CONTEXTS)),
		],
	}
}

fn insert_section() -> MenuSection {
	MenuSection {
		id: "insert",
		entries: vec![
			MenuEntry::Item(item("insert-link", "Insert Link", Action::InsertLink).contexts(EDITABLE)),
			MenuEntry::Item(
				item("insert-image", "Insert Image", Action::InsertImage).contexts(EDITABLE),
			),
			MenuEntry::Item(
				item(
					"insert-table",
					"Insert Table",
					Action::InsertTable { rows: 3, cols: 3, with_header_row: true },
				)
				.contexts(EDITABLE),
			),
			divider("insert-divider", Some(EDITABLE)),
		],
	}
}

fn search_section(request: &MenuRequest) -> MenuSection {
	let term = request.search_term().unwrap_or_default().to_string();
	let no_term = term.is_empty();
	let engines = vec![
		item(
			"search-google",
			"Google",
			Action::SearchWeb { engine: SearchEngine::Google, term: term.clone() },
		)
		.disabled(no_term),
		item("search-bing", "Bing", Action::SearchWeb { engine: SearchEngine::Bing, term: term.clone() })
			.disabled(no_term),
	];

	MenuSection {
		id: "search",
		entries: vec![
			MenuEntry::Item(
				item("search", "Search", Action::SearchNotes(term))
					.disabled(no_term)
					.contexts(EDITABLE_AND_HEADER),
			),
			MenuEntry::Submenu {
				id: "search-with".to_string(),
				label: "Search with...".to_string(),
				items: engines,
				contexts: Some(EDITABLE_AND_HEADER),
			},
		],
	}
}

fn image_section(request: &MenuRequest) -> MenuSection {
	let src = request.image_src.clone().unwrap_or_default();
	let no_src = src.is_empty();

	MenuSection {
		id: "image-options",
		entries: vec![
			MenuEntry::Item(
				item("replace-image", "Replace Image", Action::ReplaceImage).contexts(IMAGE_ONLY),
			),
			MenuEntry::Item(
				item("save-image", "Save Image As...", Action::SaveImage(src))
					.disabled(no_src)
					.contexts(IMAGE_ONLY),
			),
			divider("image-divider", Some(IMAGE_ONLY)),
		],
	}
}

fn link_section(request: &MenuRequest) -> MenuSection {
	let href = request.link_href.clone().unwrap_or_default();

	MenuSection {
		id: "link-options",
		entries: vec![
			MenuEntry::Item(
				item("open-link", "Open Link", Action::OpenLink(href.clone())).contexts(LINK_ONLY),
			),
			MenuEntry::Item(item("edit-link", "Edit Link", Action::EditLink).contexts(LINK_ONLY)),
			MenuEntry::Item(
				item("copy-link", "Copy Link Address", Action::CopyLinkAddress(href))
					.contexts(LINK_ONLY),
			),
			divider("link-divider", Some(LINK_ONLY)),
		],
	}
}
