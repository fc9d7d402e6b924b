//! Markdown to HTML conversion.
//!
//! Wraps [`pulldown_cmark`] with the extension set from [`MarkdownConfig`].
//! Tables and fenced code blocks are always enabled. Relative links that
//! point at other markdown sources are rewritten to the `.html` page the
//! target will be rendered to, so cross-references keep working in the
//! generated site.

use crate::config::MarkdownConfig;
use crate::naming::{is_markdown, slugify};
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use std::path::Path;

/// Converts markdown source text to an HTML fragment.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new(config: &MarkdownConfig) -> Self {
        let mut options = Options::ENABLE_TABLES;
        options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, config.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
        Self { options }
    }

    /// Render markdown to HTML, rewriting links to sibling markdown sources.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match rewrite_markdown_link(&dest_url) {
                    Some(rewritten) => CowStr::from(rewritten),
                    None => dest_url,
                };
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }
            other => other,
        });

        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut body, parser);
        body
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(&MarkdownConfig::default())
    }
}

/// Text of the first level-one heading, if any.
///
/// Headings inside code blocks are not headings, so this goes through the
/// parser instead of scanning lines.
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut title: Option<String> = None;

    for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(text) = title.take() {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = title.as_mut() {
                    buf.push_str(&text);
                }
            }
            _ => {}
        }
    }
    None
}

/// Map a relative link to a markdown source onto its rendered page.
///
/// - `guide.md` → `guide.html`
/// - `../tools/Setup Guide.md#install` → `../tools/setup-guide.html#install`
///
/// Returns `None` for links that must stay as written: absolute URLs,
/// root-relative paths, bare fragments, and non-markdown targets.
pub fn rewrite_markdown_link(dest: &str) -> Option<String> {
    if dest.is_empty() || dest.starts_with('#') || dest.starts_with('/') || has_scheme(dest) {
        return None;
    }

    let (path, fragment) = match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (dest, None),
    };
    if path.contains('?') || !is_markdown(Path::new(path)) {
        return None;
    }

    let (dir, file) = match path.rfind('/') {
        Some(i) => (&path[..=i], &path[i + 1..]),
        None => ("", path),
    };
    let stem = percent_decode(Path::new(file).file_stem()?.to_str()?)?;
    let page = format!("{dir}{}.html", slugify(&stem));

    Some(match fragment {
        Some(fragment) => format!("{page}#{fragment}"),
        None => page,
    })
}

/// Decode `%XX` escapes. `None` for a malformed escape or non-UTF-8 result.
fn percent_decode(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

fn has_scheme(dest: &str) -> bool {
    dest.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = MarkdownRenderer::default().render("This is **bold** and *italic*.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn renders_tables() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let html = MarkdownRenderer::default().render(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn renders_fenced_code_with_language_class() {
        let md = "```rust\nfn main() {}\n```\n";
        let html = MarkdownRenderer::default().render(md);
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn strikethrough_follows_config() {
        let on = MarkdownRenderer::default().render("~~gone~~");
        assert!(on.contains("<del>gone</del>"));

        let off = MarkdownRenderer::new(&MarkdownConfig {
            strikethrough: false,
            ..MarkdownConfig::default()
        })
        .render("~~gone~~");
        assert!(!off.contains("<del>"));
    }

    #[test]
    fn smart_punctuation_follows_config() {
        let renderer = MarkdownRenderer::new(&MarkdownConfig {
            smart_punctuation: true,
            ..MarkdownConfig::default()
        });
        assert!(renderer.render("a -- b").contains('\u{2013}'));
        assert!(!MarkdownRenderer::default().render("a -- b").contains('\u{2013}'));
    }

    #[test]
    fn rewrites_relative_markdown_links() {
        let html = MarkdownRenderer::default().render("See [setup](tools/Setup_Guide.md#install).");
        assert!(html.contains(r#"href="tools/setup-guide.html#install""#));
    }

    #[test]
    fn leaves_external_links_alone() {
        let html = MarkdownRenderer::default().render("[x](https://example.com/readme.md)");
        assert!(html.contains(r#"href="https://example.com/readme.md""#));
    }

    #[test]
    fn rewrite_cases() {
        assert_eq!(rewrite_markdown_link("guide.md").as_deref(), Some("guide.html"));
        assert_eq!(
            rewrite_markdown_link("../tools/Setup Guide.md#top").as_deref(),
            Some("../tools/setup-guide.html#top")
        );
        assert_eq!(
            rewrite_markdown_link("Setup%20Guide.MD").as_deref(),
            Some("setup-guide.html")
        );
        assert_eq!(rewrite_markdown_link("#section"), None);
        assert_eq!(rewrite_markdown_link("/abs/page.md"), None);
        assert_eq!(rewrite_markdown_link("mailto:someone@example.com"), None);
        assert_eq!(rewrite_markdown_link("diagram.svg"), None);
        assert_eq!(rewrite_markdown_link("page.md?raw=1"), None);
    }

    #[test]
    fn rewrite_decodes_percent_escapes() {
        assert_eq!(
            rewrite_markdown_link("Caf%C3%A9_Notes.md").as_deref(),
            Some("café-notes.html")
        );
        assert_eq!(
            rewrite_markdown_link("My%20Dir/Caf%c3%a9.md#menu").as_deref(),
            Some("My%20Dir/café.html#menu")
        );
        // Malformed escapes leave the link as written
        assert_eq!(rewrite_markdown_link("100%.md"), None);
        assert_eq!(rewrite_markdown_link("a%+1.md"), None);
        assert_eq!(rewrite_markdown_link("bad%FF.md"), None);
    }

    #[test]
    fn title_from_first_h1() {
        let md = "Intro line\n\n# Tools Overview\n\n# Second\n";
        assert_eq!(extract_title(md).as_deref(), Some("Tools Overview"));
    }

    #[test]
    fn title_ignores_code_block_comments() {
        let md = "```sh\n# not a heading\n```\n\n# Real Title\n";
        assert_eq!(extract_title(md).as_deref(), Some("Real Title"));
    }

    #[test]
    fn title_keeps_inline_code_text() {
        assert_eq!(
            extract_title("# The `docgen` tool").as_deref(),
            Some("The docgen tool")
        );
    }

    #[test]
    fn title_absent_without_h1() {
        assert_eq!(extract_title("## Only a subheading\n\nText."), None);
    }
}
