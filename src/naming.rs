//! Filename conventions shared by documents and sections.
//!
//! Every source entry (markdown file stem or directory name) may carry an
//! optional numeric prefix (`NNN-`) that controls ordering. The prefix never
//! changes where a page lands: the output name is always the full stem,
//! lowercased and hyphenated.
//!
//! - `Setup Guide` → slug `setup-guide`, title "Setup Guide"
//! - `020-install_notes` → slug `020-install-notes`, title "install notes", sort 20
//! - `overview` → slug `overview`, title "overview"

use std::path::Path;

/// Result of parsing an entry name like `020-Install-Notes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g. `20` from `020-Install-Notes`).
    pub number: Option<u32>,
    /// Output name: the full stem, lowercased and hyphenated.
    pub slug: String,
    /// Display title: prefix stripped, dashes and underscores turned into spaces.
    pub display_title: String,
}

impl ParsedName {
    /// Sort key: numbered entries first, in number order.
    pub fn sort_key(&self) -> u32 {
        self.number.unwrap_or(u32::MAX)
    }
}

/// Parse a file stem or directory name.
pub fn parse_entry_name(stem: &str) -> ParsedName {
    let slug = slugify(stem);

    if let Some(dash_pos) = stem.find('-')
        && let Ok(num) = stem[..dash_pos].parse::<u32>()
    {
        let rest = &stem[dash_pos + 1..];
        let display_title = display_title(rest);
        return ParsedName {
            number: Some(num),
            slug,
            // Number-only stems keep the number as their title
            display_title: if display_title.is_empty() {
                stem[..dash_pos].to_string()
            } else {
                display_title
            },
        };
    }

    ParsedName {
        number: None,
        slug,
        display_title: display_title(stem),
    }
}

/// Lowercase a stem and join its words with single hyphens.
///
/// Whitespace, underscores and dashes are all word separators; runs of them
/// collapse into one `-`. A stem with no usable characters becomes `page`.
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut pending_dash = false;

    for c in stem.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = !slug.is_empty();
            continue;
        }
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.extend(c.to_lowercase());
    }

    if slug.is_empty() {
        "page".to_string()
    } else {
        slug
    }
}

fn display_title(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a path names a markdown source (`.md` / `.markdown`, any case).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Join a site-relative directory and a name with `/`.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Directory part of a site-relative path; empty at the root.
pub fn parent_path(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}
