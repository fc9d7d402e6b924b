//! Page template loading and placeholder substitution.
//!
//! A template is an HTML base document with placeholder tokens plus a
//! stylesheet. Every page, document or index, goes through the same
//! template:
//!
//! | Token | Value |
//! |-------|-------|
//! | `{{ title }}` | Page title, HTML-escaped |
//! | `{{ site_title }}` | Configured site title, HTML-escaped |
//! | `{{ styles }}` | Stylesheet text |
//! | `{{ nav }}` | Navigation markup |
//! | `{{ content }}` | Rendered page body |
//!
//! Substitution is a single pass over the base, so text in the page content
//! that happens to look like a token is left alone. Unknown tokens are kept
//! verbatim.
//!
//! ## Custom Templates
//!
//! ```text
//! template/
//! ├── base.html        # Required
//! ├── styles.css       # Optional
//! └── highlight.css    # Optional, appended after styles.css
//! ```

use crate::config::{SiteConfig, generate_color_css};
use maud::html;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("Template directory has no base.html: {0}")]
    MissingBase(PathBuf),
}

const BUILTIN_BASE: &str = include_str!("../static/base.html");
const BUILTIN_CSS: &str = include_str!("../static/style.css");

const BASE_FILE: &str = "base.html";
const STYLE_FILES: &[&str] = &["styles.css", "highlight.css"];

/// Values substituted into the template for one page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub site_title: &'a str,
    /// Navigation markup (already HTML).
    pub nav: &'a str,
    /// Rendered body (already HTML).
    pub content: &'a str,
}

/// A loaded page template.
#[derive(Debug, Clone)]
pub struct Template {
    base: String,
    styles: String,
}

impl Template {
    /// The compiled-in template, with colors taken from config.
    pub fn builtin(config: &SiteConfig) -> Self {
        Self {
            base: BUILTIN_BASE.trim().to_string(),
            styles: format!("{}\n\n{}", generate_color_css(&config.colors), BUILTIN_CSS.trim()),
        }
    }

    /// Load `base.html` and the optional stylesheets from a directory.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::NotADirectory(dir.to_path_buf()));
        }
        let base_path = dir.join(BASE_FILE);
        if !base_path.is_file() {
            return Err(TemplateError::MissingBase(dir.to_path_buf()));
        }

        let base = fs::read_to_string(&base_path)?.trim().to_string();
        if !base.contains("{{ content }}") && !base.contains("{{content}}") {
            warn!(template = %base_path.display(), "template has no {{{{ content }}}} placeholder");
        }

        let mut styles = String::new();
        for name in STYLE_FILES {
            let css_path = dir.join(name);
            if css_path.is_file() {
                if !styles.is_empty() {
                    styles.push('\n');
                }
                styles.push_str(fs::read_to_string(&css_path)?.trim());
            }
        }

        debug!(dir = %dir.display(), "loaded custom template");
        Ok(Self { base, styles })
    }

    /// Pick the template for a build.
    ///
    /// Order: the `--template` override (relative to the working directory),
    /// then `template_dir` from config (relative to the source root), then
    /// the built-in template.
    pub fn resolve(
        config: &SiteConfig,
        override_dir: Option<&Path>,
        source_root: &Path,
    ) -> Result<Self, TemplateError> {
        if let Some(dir) = override_dir {
            return Self::load(dir);
        }
        if let Some(dir) = &config.template_dir {
            return Self::load(&source_root.join(dir));
        }
        Ok(Self::builtin(config))
    }

    pub fn styles(&self) -> &str {
        &self.styles
    }

    /// Render one page.
    pub fn render(&self, page: &PageContext<'_>) -> String {
        let title = html! { (page.title) }.into_string();
        let site_title = html! { (page.site_title) }.into_string();

        fill(&self.base, |key| match key {
            "title" => Some(title.as_str()),
            "site_title" => Some(site_title.as_str()),
            "styles" => Some(self.styles.as_str()),
            "nav" => Some(page.nav),
            "content" => Some(page.content),
            _ => None,
        })
    }
}

/// Replace `{{ key }}` tokens in `base` in a single pass.
///
/// Whitespace inside the braces is optional. Tokens `lookup` does not know
/// are copied through unchanged, as is a `{{` with no matching `}}` before
/// the next `{{`.
pub fn fill<'a>(base: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(base.len());
    let mut rest = base;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        // `{{ a {{ content }}`: the first `{{` is literal text
        if let Some(inner) = after[..end].find("{{") {
            out.push_str(&rest[start..start + 2 + inner]);
            rest = &after[inner..];
            continue;
        }

        let token = &rest[start..start + 2 + end + 2];
        match lookup(after[..end].trim()) {
            Some(value) => out.push_str(value),
            None => out.push_str(token),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn page<'a>(content: &'a str) -> PageContext<'a> {
        PageContext {
            title: "Tools Overview",
            site_title: "Team Docs",
            nav: "<nav>n</nav>",
            content,
        }
    }

    #[test]
    fn fill_replaces_known_tokens() {
        let out = fill("<h1>{{ title }}</h1>{{content}}", |k| match k {
            "title" => Some("T"),
            "content" => Some("<p>c</p>"),
            _ => None,
        });
        assert_eq!(out, "<h1>T</h1><p>c</p>");
    }

    #[test]
    fn fill_keeps_unknown_and_unterminated_tokens() {
        let out = fill("{{ author }} and {{ title", |_| Some("x"));
        assert_eq!(out, "x and {{ title");

        let out = fill("a {{ author }} b", |_| None);
        assert_eq!(out, "a {{ author }} b");
    }

    #[test]
    fn fill_stray_open_braces_do_not_swallow_next_token() {
        let out = fill("{{ a {{ content }} b {{{{ title }}", |k| match k {
            "content" => Some("<p>c</p>"),
            "title" => Some("T"),
            _ => None,
        });
        assert_eq!(out, "{{ a <p>c</p> b {{T");
    }

    #[test]
    fn fill_does_not_expand_substituted_values() {
        let out = fill("{{ content }}|{{ title }}", |k| match k {
            "content" => Some("{{ title }}"),
            "title" => Some("T"),
            _ => None,
        });
        assert_eq!(out, "{{ title }}|T");
    }

    #[test]
    fn builtin_renders_all_parts() {
        let template = Template::builtin(&SiteConfig::default());
        let html = template.render(&page("<p>Body text</p>"));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Tools Overview</title>"));
        assert!(html.contains("Team Docs"));
        assert!(html.contains("<nav>n</nav>"));
        assert!(html.contains("<p>Body text</p>"));
        assert!(html.contains("--color-bg: #ffffff;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn title_is_escaped() {
        let template = Template::builtin(&SiteConfig::default());
        let html = template.render(&PageContext {
            title: "<script>alert('x')</script>",
            ..page("")
        });
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn load_custom_template() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("base.html"),
            "  <html><style>{{ styles }}</style><title>{{ title }}</title>{{ content }}</html>\n",
        )
        .unwrap();
        fs::write(tmp.path().join("styles.css"), "body { margin: 0; }\n").unwrap();
        fs::write(tmp.path().join("highlight.css"), ".k { color: red; }").unwrap();

        let template = Template::load(tmp.path()).unwrap();
        assert_eq!(template.styles(), "body { margin: 0; }\n.k { color: red; }");

        let html = template.render(&page("<p>x</p>"));
        assert_eq!(
            html,
            "<html><style>body { margin: 0; }\n.k { color: red; }</style>\
             <title>Tools Overview</title><p>x</p></html>"
        );
    }

    #[test]
    fn stylesheets_are_optional() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("base.html"), "{{ content }}").unwrap();
        let template = Template::load(tmp.path()).unwrap();
        assert_eq!(template.styles(), "");
    }

    #[test]
    fn missing_base_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Template::load(tmp.path()),
            Err(TemplateError::MissingBase(_))
        ));
        assert!(matches!(
            Template::load(&tmp.path().join("nope")),
            Err(TemplateError::NotADirectory(_))
        ));
    }

    #[test]
    fn resolve_prefers_override_then_config() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("docs");
        fs::create_dir_all(source.join("theme")).unwrap();
        fs::write(source.join("theme/base.html"), "config {{ content }}").unwrap();
        let cli = tmp.path().join("cli");
        fs::create_dir_all(&cli).unwrap();
        fs::write(cli.join("base.html"), "cli {{ content }}").unwrap();

        let config = SiteConfig {
            template_dir: Some("theme".to_string()),
            ..SiteConfig::default()
        };

        let from_cli = Template::resolve(&config, Some(&cli), &source).unwrap();
        assert!(from_cli.render(&page("x")).starts_with("cli"));

        let from_config = Template::resolve(&config, None, &source).unwrap();
        assert!(from_config.render(&page("x")).starts_with("config"));

        let builtin = Template::resolve(&SiteConfig::default(), None, &source).unwrap();
        assert!(builtin.render(&page("x")).starts_with("<!DOCTYPE html>"));
    }
}
