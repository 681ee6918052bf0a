use std::ops::Range;

use crate::spelling::SpellChecker;

pub const DEFAULT_WORD_SCAN_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTag {
	Text,
	Header,
	NoteBody,
	Image,
	Link,
}
impl ContextTag {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Header => "header",
			Self::NoteBody => "noteBody",
			Self::Image => "image",
			Self::Link => "link",
		}
	}
}

/// The kind of block the cursor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	Paragraph,
	Heading,
	ListItem,
	CodeBlock,
	Image,
	/// Blank editor area or an empty block.
	Empty,
}

/// What the editor reports about the cursor when the menu is requested. Offsets are in chars and
/// relative to `text`, the text of the surrounding block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
	pub block: BlockKind,
	pub text: String,
	pub selection: Range<usize>,
	pub link_href: Option<String>,
	pub image_src: Option<String>,
}
impl CursorContext {
	pub fn caret(block: BlockKind, text: impl Into<String>, offset: usize) -> Self {
		Self { block, text: text.into(), selection: offset..offset, link_href: None, image_src: None }
	}

	pub fn selection(block: BlockKind, text: impl Into<String>, selection: Range<usize>) -> Self {
		Self { block, text: text.into(), selection, link_href: None, image_src: None }
	}

	pub fn image(src: impl Into<String>) -> Self {
		Self {
			block: BlockKind::Image,
			text: String::new(),
			selection: 0..0,
			link_href: None,
			image_src: Some(src.into()),
		}
	}

	pub fn with_link(mut self, href: impl Into<String>) -> Self {
		self.link_href = Some(href.into());

		self
	}

	pub fn has_selection(&self) -> bool {
		self.selection.start < self.selection.end
	}

	pub fn selected_text(&self) -> String {
		let (start, end) = self.clamped_selection();

		self.text.chars().skip(start).take(end - start).collect()
	}

	fn clamped_selection(&self) -> (usize, usize) {
		let len = self.text.chars().count();
		let start = self.selection.start.min(len);
		let end = self.selection.end.clamp(start, len);

		(start, end)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
	pub word: String,
	pub range: Range<usize>,
}

/// The request a menu is built from: the resolved tag, the text actions operate on, and the
/// spelling state of the word under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRequest {
	pub tag: ContextTag,
	pub selected_text: String,
	pub target: Option<WordMatch>,
	pub misspelled: bool,
	pub suggestions: Vec<String>,
	pub link_href: Option<String>,
	pub image_src: Option<String>,
}
impl MenuRequest {
	pub fn from_cursor(ctx: &CursorContext, checker: &SpellChecker, window: usize) -> Self {
		let tag = classify(ctx, window);
		let target = spell_target(ctx, window);
		let misspelled = target.as_ref().is_some_and(|target| checker.is_misspelled(&target.word));
		let suggestions = match (&target, misspelled) {
			(Some(target), true) => checker.suggestions(&target.word),
			_ => Vec::new(),
		};
		let selected_text = ctx.selected_text();

		Self {
			tag,
			selected_text,
			target,
			misspelled,
			suggestions,
			link_href: ctx.link_href.clone(),
			image_src: ctx.image_src.clone(),
		}
	}

	/// Text used by search actions: the selection, or the word under the cursor.
	pub fn search_term(&self) -> Option<&str> {
		let selected = self.selected_text.trim();

		if !selected.is_empty() {
			return Some(selected);
		}

		self.target.as_ref().map(|target| target.word.as_str())
	}
}

pub fn classify(ctx: &CursorContext, window: usize) -> ContextTag {
	match ctx.block {
		BlockKind::Image => ContextTag::Image,
		_ if ctx.link_href.is_some() => ContextTag::Link,
		BlockKind::Heading => ContextTag::Header,
		BlockKind::Empty => ContextTag::NoteBody,
		_ => {
			let has_text_selection = ctx.has_selection() && !ctx.selected_text().trim().is_empty();

			if has_text_selection || word_at(&ctx.text, ctx.selection.start, window).is_some() {
				ContextTag::Text
			} else {
				ContextTag::NoteBody
			}
		},
	}
}

/// The longest run of word characters touching `cursor`, looking at most `window` chars to each
/// side.
pub fn word_at(text: &str, cursor: usize, window: usize) -> Option<WordMatch> {
	let chars: Vec<char> = text.chars().collect();
	let cursor = cursor.min(chars.len());
	let lower = cursor.saturating_sub(window);
	let upper = cursor.saturating_add(window).min(chars.len());
	let mut start = cursor;
	let mut end = cursor;

	while start > lower && is_word_char(chars[start - 1]) {
		start -= 1;
	}
	while end < upper && is_word_char(chars[end]) {
		end += 1;
	}

	(start < end).then(|| WordMatch { word: chars[start..end].iter().collect(), range: start..end })
}

/// The word to spell-check: a selection counts only when it is one contiguous word.
pub fn spell_target(ctx: &CursorContext, window: usize) -> Option<WordMatch> {
	if !ctx.has_selection() {
		return word_at(&ctx.text, ctx.selection.start, window);
	}

	let (start, end) = ctx.clamped_selection();
	let selected: Vec<char> = ctx.text.chars().skip(start).take(end - start).collect();
	let leading = selected.iter().take_while(|c| c.is_whitespace()).count();
	let trailing = selected.iter().rev().take_while(|c| c.is_whitespace()).count();

	if leading == selected.len() {
		return None;
	}

	let word = &selected[leading..selected.len() - trailing];

	if word.iter().any(|c| c.is_whitespace()) {
		return None;
	}

	Some(WordMatch {
		word: word.iter().collect(),
		range: start + leading..end - trailing,
	})
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}
