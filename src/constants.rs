//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the sink API's hard limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "revanchor";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.revanchor.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".revanchor.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "revanchor";

/// Title line used at the top of every non-inline note.
pub const BOT_TITLE: &str = "### 🤖 Review Bot";

/// Opening fence of a machine-applicable replacement block.
pub const SUGGESTION_FENCE: &str = "```suggestion";

/// Closing fence of any fenced block.
pub const FENCE_CLOSE: &str = "```";

/// Default marker appended to synthesized replacement lines.
pub const DEFAULT_BOT_MARKER: &str = "review-bot";

/// Title of the single section produced for files without section markers.
pub const ENTIRE_FILE_SECTION: &str = "entire-file";

/// Body of the placeholder part for files the review document skipped.
pub const NO_SUGGESTIONS_TEXT: &str = "_No explicit suggestions generated for this file._";

// ── Sink API hard limits ────────────────────────────────────────────

/// Maximum characters accepted in a single comment or note body.
pub const MAX_BODY_CHARS: usize = 65_000;

/// Maximum inline comments accepted in one review batch.
pub const MAX_COMMENTS_PER_BATCH: usize = 50;

/// Default GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Fixed per-call network timeout for boundary requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_MAX_COMMENTS: &str = "REVANCHOR_MAX_COMMENTS";
pub const ENV_MAX_BODY_CHARS: &str = "REVANCHOR_MAX_BODY_CHARS";
pub const ENV_EXTENSIONS: &str = "REVANCHOR_EXTENSIONS";
pub const ENV_RULES: &str = "REVANCHOR_RULES";
pub const ENV_GITHUB_API_URL: &str = "REVANCHOR_GITHUB_API_URL";

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
