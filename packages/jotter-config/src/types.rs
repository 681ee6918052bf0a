use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub storage: Storage,
	#[serde(default)]
	pub editor: Editor,
	#[serde(default)]
	pub client: Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Seeds the Work/Personal/Projects folders and a sample note on startup. The protected
	/// "All Notes" folder is created either way.
	#[serde(default = "default_true")]
	pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Editor {
	/// Quiet period before a pending edit is saved.
	#[serde(default = "default_autosave_debounce_ms")]
	pub autosave_debounce_ms: u64,
	/// Characters scanned on each side of the cursor when resolving the word under it.
	#[serde(default = "default_word_scan_window")]
	pub word_scan_window: usize,
	#[serde(default = "default_max_spelling_suggestions")]
	pub max_spelling_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Client {
	#[serde(default = "default_api_base")]
	pub api_base: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

impl Default for Storage {
	fn default() -> Self {
		Self { seed_sample_data: default_true() }
	}
}

impl Default for Editor {
	fn default() -> Self {
		Self {
			autosave_debounce_ms: default_autosave_debounce_ms(),
			word_scan_window: default_word_scan_window(),
			max_spelling_suggestions: default_max_spelling_suggestions(),
		}
	}
}

impl Default for Client {
	fn default() -> Self {
		Self { api_base: default_api_base(), timeout_ms: default_timeout_ms() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_true() -> bool {
	true
}

fn default_autosave_debounce_ms() -> u64 {
	1_000
}

fn default_word_scan_window() -> usize {
	50
}

fn default_max_spelling_suggestions() -> usize {
	4
}

fn default_api_base() -> String {
	"http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}
