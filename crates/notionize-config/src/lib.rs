//! Configuration management for notionize.
//!
//! Reads the static-site generator's `mkdocs.yml`, auto-discovered in the
//! current directory and its parents, and extracts:
//!
//! - site-level settings (`site_name`, `site_dir`, `use_directory_urls`, `nav`)
//! - the `notion` entry of the `plugins` list as [`NotionConfig`]
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variables
//!
//! Plugin string values support `${VAR}` and `${VAR:-default}` expansion, and
//! the MkDocs `!ENV` tag is resolved anywhere in the file. Expanded fields:
//! - `notion.notion_token`
//! - `notion.parent_page_id`
//! - `notion.database_id`
//! - `notion.api_url`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the generated site directory.
    pub site_dir: Option<PathBuf>,
    /// Override the Notion integration token.
    pub notion_token: Option<String>,
}

/// Configuration filenames to search for, in order.
const CONFIG_FILENAMES: [&str; 2] = ["mkdocs.yml", "mkdocs.yaml"];

/// Name of the plugin entry in the `plugins` list.
const PLUGIN_NAME: &str = "notion";

/// Utility pages never published.
pub const DEFAULT_EXCLUDE: [&str; 3] = ["404.html", "search/*", "search.html"];

/// Maximum number of blocks the API accepts in one append call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Public Notion API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    /// Site name, used as the title of the home page when it has no heading.
    pub site_name: String,
    /// Directory holding the generated HTML (absolute after loading).
    pub site_dir: PathBuf,
    /// Whether pages are generated as `page/index.html` rather than `page.html`.
    pub use_directory_urls: bool,
    /// Source paths from the `nav` setting, flattened in navigation order.
    pub nav: Vec<String>,
    /// Notion plugin configuration, if the plugin is listed.
    pub notion: Option<NotionConfig>,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

/// Raw `mkdocs.yml` as parsed from YAML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MkdocsRaw {
    site_name: Option<String>,
    site_dir: Option<String>,
    use_directory_urls: Option<bool>,
    nav: Option<Value>,
    plugins: Option<Value>,
}

/// Notion plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Notion integration token.
    #[serde(deserialize_with = "string_or_null")]
    pub notion_token: String,
    /// Page under which the site's root pages are created.
    #[serde(deserialize_with = "string_or_null")]
    pub parent_page_id: String,
    /// Legacy database target, superseded by `parent_page_id`.
    pub database_id: Option<String>,
    /// Glob patterns (relative to the site directory) of pages to skip.
    pub exclude: Vec<String>,
    /// Append previous/next navigation links to every published page.
    pub navigation_links: bool,
    /// Blocks per append call.
    pub batch_size: usize,
    /// Retries for rate-limited or failed calls.
    pub max_retries: u32,
    /// First backoff delay in milliseconds.
    pub retry_initial_delay_ms: u64,
    /// Backoff ceiling in milliseconds.
    pub retry_max_delay_ms: u64,
    /// Timeout for a single HTTP attempt, in seconds.
    pub timeout_secs: u64,
    /// Notion API base URL.
    pub api_url: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            notion_token: String::new(),
            parent_page_id: String::new(),
            database_id: None,
            exclude: DEFAULT_EXCLUDE.iter().map(|&p| p.to_owned()).collect(),
            navigation_links: true,
            batch_size: MAX_BATCH_SIZE,
            max_retries: 5,
            retry_initial_delay_ms: 1_000,
            retry_max_delay_ms: 30_000,
            timeout_secs: 30,
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }
}

impl NotionConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notion_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "notion.notion_token is required (set it in mkdocs.yml or NOTION_TOKEN)".to_owned(),
            ));
        }
        require_non_empty(&self.parent_page_id, "notion.parent_page_id")?;
        if normalize_page_id(&self.parent_page_id).is_none() {
            return Err(ConfigError::Validation(format!(
                "notion.parent_page_id is not a Notion page id: {}",
                self.parent_page_id
            )));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Validation(format!(
                "notion.batch_size must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }
        if self.retry_max_delay_ms < self.retry_initial_delay_ms {
            return Err(ConfigError::Validation(
                "notion.retry_max_delay_ms cannot be lower than notion.retry_initial_delay_ms"
                    .to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "notion.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        require_http_url(&self.api_url, "notion.api_url")?;
        Ok(())
    }

    /// Parent page id in canonical dashed form.
    ///
    /// Returns `None` if the configured value is not a page id or page URL.
    #[must_use]
    pub fn parent_page_id(&self) -> Option<String> {
        normalize_page_id(&self.parent_page_id)
    }

    /// First backoff delay.
    #[must_use]
    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry_initial_delay_ms)
    }

    /// Backoff ceiling.
    #[must_use]
    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    /// Timeout for a single HTTP attempt.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Canonicalize a Notion page id.
///
/// Accepts dashed or undashed 32-digit hex ids and page URLs such as
/// `https://www.notion.so/Docs-0123456789abcdef0123456789abcdef?pvs=4`,
/// whose trailing id is extracted.
///
/// ```
/// use notionize_config::normalize_page_id;
///
/// assert_eq!(
///     normalize_page_id("0123456789abcdef0123456789ABCDEF").as_deref(),
///     Some("01234567-89ab-cdef-0123-456789abcdef"),
/// );
/// assert_eq!(normalize_page_id("not-an-id"), None);
/// ```
#[must_use]
pub fn normalize_page_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let without_query = raw.split(['?', '#']).next().unwrap_or(raw);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);
    let compact: String = segment.chars().filter(|c| *c != '-').collect();
    if compact.len() < 32 || !compact.is_char_boundary(compact.len() - 32) {
        return None;
    }
    let hex = compact[compact.len() - 32..].to_ascii_lowercase();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    // A bare id must be exactly the hex digits; URLs may carry a title slug.
    if !raw.contains('/') && compact.len() != 32 {
        return None;
    }
    Some(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`notion.notion_token`").
        field: String,
        /// Error message (e.g., "${`NOTION_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mkdocs.yml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no configuration file exists, or a
    /// parse/expansion error if the file is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => Self::discover_config().ok_or_else(|| {
                ConfigError::NotFound(PathBuf::from(CONFIG_FILENAMES[0]))
            })?,
        };

        let content = std::fs::read_to_string(&path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::parse(&content, config_dir, |var| std::env::var(var).ok())?;
        config.config_path = Some(path);

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Get validated Notion configuration.
    ///
    /// Use this instead of the `notion` field when the command publishes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the plugin entry is missing or invalid.
    pub fn require_notion(&self) -> Result<&NotionConfig, ConfigError> {
        let notion = self.notion.as_ref().ok_or_else(|| {
            ConfigError::Validation(format!(
                "`{PLUGIN_NAME}` plugin entry required under `plugins` in mkdocs.yml"
            ))
        })?;
        notion.validate()?;
        Ok(notion)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_dir) = &settings.site_dir {
            self.site_dir.clone_from(site_dir);
        }
        if let Some(token) = &settings.notion_token {
            self.notion
                .get_or_insert_with(NotionConfig::default)
                .notion_token
                .clone_from(token);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            for name in CONFIG_FILENAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Parse configuration content, resolving paths against `config_dir`.
    fn parse(
        content: &str,
        config_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(content)?;
        let document = expand::untag_env(document, &lookup);
        let raw: MkdocsRaw = if document.is_null() {
            MkdocsRaw::default()
        } else {
            serde_yaml::from_value(document)?
        };

        let notion = match raw.plugins.as_ref().and_then(notion_section) {
            Some(Value::Null) => Some(NotionConfig::default()),
            Some(section) => Some(serde_yaml::from_value(section)?),
            None => None,
        };
        let notion = notion
            .map(|section| expand_notion(section, &lookup))
            .transpose()?;
        if let Some(database_id) = notion.as_ref().and_then(|n| n.database_id.as_ref()) {
            tracing::warn!(
                database_id = %database_id,
                "notion.database_id is deprecated and ignored; pages are created under parent_page_id"
            );
        }

        let mut nav = Vec::new();
        if let Some(value) = &raw.nav {
            flatten_nav(value, &mut nav);
        }

        Ok(Self {
            site_name: raw.site_name.unwrap_or_default(),
            site_dir: config_dir.join(raw.site_dir.as_deref().unwrap_or("site")),
            use_directory_urls: raw.use_directory_urls.unwrap_or(true),
            nav,
            notion,
            config_path: None,
        })
    }
}

/// Expand environment variable references in the plugin's string fields.
fn expand_notion(
    mut notion: NotionConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<NotionConfig, ConfigError> {
    notion.notion_token =
        expand::expand_with(&notion.notion_token, "notion.notion_token", lookup)?;
    notion.parent_page_id =
        expand::expand_with(&notion.parent_page_id, "notion.parent_page_id", lookup)?;
    if let Some(database_id) = &notion.database_id {
        notion.database_id = Some(expand::expand_with(
            database_id,
            "notion.database_id",
            lookup,
        )?);
    }
    notion.api_url = expand::expand_with(&notion.api_url, "notion.api_url", lookup)?;
    Ok(notion)
}

/// Find the `notion` entry in a `plugins` list or mapping.
///
/// A bare `- notion` entry yields `Value::Null` (all defaults).
fn notion_section(plugins: &Value) -> Option<Value> {
    match plugins {
        Value::Sequence(items) => items.iter().find_map(|item| match item {
            Value::String(name) if name == PLUGIN_NAME => Some(Value::Null),
            Value::Mapping(map) => map.get(PLUGIN_NAME).cloned(),
            _ => None,
        }),
        Value::Mapping(map) => map.get(PLUGIN_NAME).cloned(),
        _ => None,
    }
}

/// Collect page source paths from a `nav` tree, depth-first.
///
/// Section titles are mapping keys; external links are skipped.
fn flatten_nav(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(path) if !path.contains("://") => out.push(path.clone()),
        Value::Sequence(items) => {
            for item in items {
                flatten_nav(item, out);
            }
        }
        Value::Mapping(map) => {
            for item in map.values() {
                flatten_nav(item, out);
            }
        }
        _ => {}
    }
}
