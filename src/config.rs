//! Site configuration module.
//!
//! Handles loading, validating, and merging `docgen.toml`. The file lives in
//! the source root; stock defaults are the base layer and the user file is
//! merged on top, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Documentation"  # Title of the root index page
//! indexes = true                # Write index.html into every section
//! exclude = []                  # File or directory names to skip
//! # template_dir = "template"   # Custom template, relative to the source root
//!
//! [markdown]
//! footnotes = true
//! strikethrough = true
//! tasklists = true
//! smart_punctuation = false
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1a1a1a"
//! text_muted = "#666666"        # Breadcrumbs, page navigation
//! border = "#e0e0e0"
//! link = "#0b5fb3"
//! link_hover = "#073f78"
//! code_background = "#f5f5f5"
//!
//! [colors.dark]
//! background = "#111111"
//! text = "#e6e6e6"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#6cb0f5"
//! link_hover = "#a8d1fa"
//! code_background = "#1d1d1d"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILE: &str = "docgen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `docgen.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title of the root index page and the `{{ site_title }}` placeholder.
    pub site_title: String,
    /// Custom template directory, relative to the source root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,
    /// Whether each section gets a generated `index.html`.
    pub indexes: bool,
    /// File or directory names skipped during the scan.
    pub exclude: Vec<String>,
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Color schemes for the built-in stylesheet.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Documentation".to_string(),
            template_dir: None,
            indexes: true,
            exclude: Vec::new(),
            markdown: MarkdownConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        if let Some(dir) = &self.template_dir
            && dir.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "template_dir must not be empty when set".into(),
            ));
        }
        if let Some(bad) = self
            .exclude
            .iter()
            .find(|name| name.is_empty() || name.contains(['/', '\\']))
        {
            return Err(ConfigError::Validation(format!(
                "exclude entries must be bare file names, got {bad:?}"
            )));
        }
        Ok(())
    }

    /// Whether a file or directory name is listed in `exclude`.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }
}

/// Markdown extensions passed to the renderer.
///
/// Tables and fenced code blocks are always on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    /// Curly quotes, en/em dashes and ellipses.
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    /// Keys missing from a partial `[colors.dark]` table fall back to the
    /// dark defaults, not the light ones.
    #[serde(
        default = "ColorScheme::default_dark",
        deserialize_with = "deserialize_dark_scheme"
    )]
    pub dark: ColorScheme,
}

fn deserialize_dark_scheme<'de, D>(deserializer: D) -> Result<ColorScheme, D::Error>
where
    D: Deserializer<'de>,
{
    let overlay = toml::Value::deserialize(deserializer)?;
    let base = toml::Value::try_from(ColorScheme::default_dark()).map_err(D::Error::custom)?;
    merge_toml(base, overlay)
        .try_into()
        .map_err(D::Error::custom)
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text (breadcrumbs, page navigation).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Background of code blocks and inline code.
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#0b5fb3".to_string(),
            link_hover: "#073f78".to_string(),
            code_background: "#f5f5f5".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111111".to_string(),
            text: "#e6e6e6".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#6cb0f5".to_string(),
            link_hover: "#a8d1fa".to_string(),
            code_background: "#1d1d1d".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `docgen.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `docgen.toml` in the given directory, falling back to
/// stock defaults when the file is absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `docgen.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docgen configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file in the root of the source directory as docgen.toml.
# Unknown keys will cause an error.

# Title of the root index page (also available to templates as {{ site_title }}).
site_title = "Documentation"

# Write an index.html into every directory that contains documents.
# A directory's index.md becomes the top of its index page.
indexes = true

# File or directory names to skip entirely (neither rendered nor copied).
exclude = []

# Custom template directory, relative to the source root. It must contain
# base.html and may contain styles.css and highlight.css.
# Omit to use the built-in template.
# template_dir = "template"

# ---------------------------------------------------------------------------
# Markdown extensions (tables and fenced code blocks are always enabled)
# ---------------------------------------------------------------------------
[markdown]
footnotes = true
strikethrough = true
tasklists = true
smart_punctuation = false

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1a1a1a"
text_muted = "#666666"    # Breadcrumbs, page navigation
border = "#e0e0e0"
link = "#0b5fb3"
link_hover = "#073f78"
code_background = "#f5f5f5"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111111"
text = "#e6e6e6"
text_muted = "#999999"
border = "#333333"
link = "#6cb0f5"
link_hover = "#a8d1fa"
code_background = "#1d1d1d"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = scheme_variables(&colors.light, "    "),
        dark = scheme_variables(&colors.dark, "        "),
    )
}

fn scheme_variables(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-code-bg", &scheme.code_background),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}
