//! Dictionary-backed spell checking for the editor context menu: a fixed table of common words
//! and their usual misspellings, plus edit-distance suggestions.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 4;

const PUNCTUATION_PATTERN: &str = r"[.,/#!$%^&*;:{}=\-_`~()]";
const MAX_SUGGESTION_DISTANCE: usize = 3;
const MIN_PREFIX_SUGGESTIONS: usize = 3;

const DICTIONARY: &[(&str, &[&str])] = &[
	("hello", &["hallo", "helo", "hullo", "hellow"]),
	("world", &["worlld", "worild", "wordl", "wrold"]),
	("their", &["thier", "there", "thair", "ther"]),
	("they", &["thay", "thy", "dey", "tey"]),
	("receive", &["recieve", "receve", "receeve", "reciive"]),
	("believe", &["beleive", "belive", "bleieve", "bilieve"]),
	("separate", &["seperate", "seprate", "separete", "saparate"]),
	("definitely", &["definately", "definatly", "definetly", "defiantly"]),
	("necessary", &["neccessary", "necessery", "neccesary", "necesary"]),
	("argument", &["arguement", "arguemant", "arguiment", "argumint"]),
	("environment", &["enviroment", "enviornment", "environement", "envirument"]),
	("occurrence", &["occurence", "occurrance", "ocurrence", "occurance"]),
	("tomorrow", &["tommorow", "tommorrow", "tomorow", "tomoro"]),
	("beginning", &["begining", "beginnning", "beggining"]),
	("accidentally", &["accidently", "accidentaly", "accidentlly", "acidentally"]),
	("address", &["adress", "addres", "addrress", "addresse"]),
	("business", &["busines", "buisness", "busness", "bussiness"]),
	("calendar", &["calender", "calander", "callendar", "calandar"]),
	("conscience", &["concience", "consience", "concsience", "conscence"]),
	("colleague", &["collegue", "colleage", "collaegue", "colleauge"]),
	("embarrass", &["embarass", "embaras", "embaress"]),
	("grammar", &["grammer", "gramar", "gramer"]),
	("hollow", &["hallow", "holow", "halllow", "hollaw"]),
	("immediate", &["imediate", "immedate", "imediatte", "immidiate"]),
	("possess", &["posess", "possses", "posses", "posesses"]),
	("restaurant", &["restaraunt", "restarant", "restraunt", "resturant"]),
	("rhythm", &["rythm", "rhythem", "ryththm", "rythym"]),
];

#[derive(Debug, Clone)]
pub struct SpellChecker {
	corrections: HashMap<&'static str, &'static str>,
	custom_words: BTreeSet<String>,
	max_suggestions: usize,
}
impl SpellChecker {
	pub fn new(max_suggestions: usize) -> Self {
		let corrections = DICTIONARY
			.iter()
			.flat_map(|(word, misspellings)| misspellings.iter().map(move |wrong| (*wrong, *word)))
			.collect();

		Self { corrections, custom_words: BTreeSet::new(), max_suggestions }
	}

	/// Returns the correction when `word` is a known misspelling and not a custom word.
	pub fn check(&self, word: &str) -> Option<&'static str> {
		let lowered = word.to_lowercase();

		if self.custom_words.contains(&lowered) {
			return None;
		}

		self.corrections.get(lowered.as_str()).copied()
	}

	pub fn is_misspelled(&self, word: &str) -> bool {
		self.check(word).is_some()
	}

	pub fn suggestions(&self, word: &str) -> Vec<String> {
		if let Some(correction) = self.check(word) {
			return vec![correction.to_string()];
		}

		let lowered = word.to_lowercase();
		let Some(first) = lowered.chars().next() else {
			return Vec::new();
		};
		let mut suggestions: Vec<&str> = DICTIONARY
			.iter()
			.map(|(correct, _)| *correct)
			.filter(|correct| correct.starts_with(first))
			.collect();

		if suggestions.len() < MIN_PREFIX_SUGGESTIONS {
			for (correct, _) in DICTIONARY {
				if !suggestions.contains(correct)
					&& levenshtein(&lowered, correct) <= MAX_SUGGESTION_DISTANCE
				{
					suggestions.push(*correct);
				}
			}
		}

		suggestions.into_iter().take(self.max_suggestions).map(str::to_string).collect()
	}

	/// Words longer than one character that the dictionary flags, in text order.
	pub fn find_misspelled(&self, text: &str) -> Vec<String> {
		let punctuation = Regex::new(PUNCTUATION_PATTERN).ok();

		text.split_whitespace()
			.map(|raw| match punctuation.as_ref() {
				Some(re) => re.replace_all(raw, "").into_owned(),
				None => raw.to_string(),
			})
			.filter(|word| word.chars().count() > 1 && self.is_misspelled(word))
			.collect()
	}

	/// Accepts `word` for the rest of the session. Returns `false` when it was already accepted.
	pub fn add_to_dictionary(&mut self, word: &str) -> bool {
		let word = word.trim().to_lowercase();

		if word.is_empty() {
			return false;
		}

		tracing::debug!(%word, "Added word to the custom dictionary.");

		self.custom_words.insert(word)
	}

	pub fn custom_words(&self) -> impl Iterator<Item = &str> {
		self.custom_words.iter().map(String::as_str)
	}
}
impl Default for SpellChecker {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_SUGGESTIONS)
	}
}

/// Minimum number of single-character insertions, deletions, or substitutions turning `a` into
/// `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();
	let mut previous: Vec<usize> = (0..=b.len()).collect();
	let mut current = vec![0; b.len() + 1];

	for (i, left) in a.iter().enumerate() {
		current[0] = i + 1;

		for (j, right) in b.iter().enumerate() {
			let substitution = previous[j] + usize::from(left != right);

			current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
		}

		std::mem::swap(&mut previous, &mut current);
	}

	previous[b.len()]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn levenshtein_matches_known_distances() {
		assert_eq!(levenshtein("", ""), 0);
		assert_eq!(levenshtein("kitten", "sitting"), 3);
		assert_eq!(levenshtein("flaw", "lawn"), 2);
		assert_eq!(levenshtein("abc", ""), 3);
	}

	#[test]
	fn corrections_ignore_case() {
		let checker = SpellChecker::default();

		assert_eq!(checker.check("Recieve"), Some("receive"));
		assert_eq!(checker.check("receive"), None);
	}

	#[test]
	fn custom_words_are_never_flagged() {
		let mut checker = SpellChecker::default();

		assert!(checker.is_misspelled("hallow"));
		assert!(checker.add_to_dictionary("Hallow"));
		assert!(!checker.add_to_dictionary("hallow"));
		assert!(!checker.is_misspelled("hallow"));
		assert_eq!(checker.custom_words().collect::<Vec<_>>(), vec!["hallow"]);
	}
}
