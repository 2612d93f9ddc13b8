//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and review limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "critiq";

/// Crate version, injected by cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.critiq.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".critiq.toml";

/// Directory name under `~/.config/` for global config and cache.
pub const CONFIG_DIR: &str = "critiq";

/// Max tokens for the code portion of the prompt. Leaves room for the
/// system prompt and the model's response.
pub const DEFAULT_TOKEN_BUDGET: usize = 6000;

/// Hard character cap applied before the token pipeline runs (~2500 lines).
pub const MAX_CODE_CHARS: usize = 100_000;

/// Default cache entry time-to-live: 24 hours.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;


// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "CRITIQ_PROVIDER";
pub const ENV_MODEL: &str = "CRITIQ_MODEL";
pub const ENV_API_KEY: &str = "CRITIQ_API_KEY";
pub const ENV_BASE_URL: &str = "CRITIQ_BASE_URL";
pub const ENV_CACHE_TTL: &str = "CRITIQ_CACHE_TTL";
