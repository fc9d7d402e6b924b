//! CLI output formatting for the pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, document) is its title and positional index,
//! with filesystem paths shown as secondary context via indented `Source:`
//! lines. The output reads as a table of contents while still letting users
//! trace each page back to its file.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sections
//! 001 Team Docs (3 pages)
//!     Source: ./
//!     001 Getting Started
//!         Source: getting-started.md
//!     001 Technical Notes (1 page)
//!         Source: technical/
//!         Landing: technical/index.md
//!         001 Architecture
//!             Source: technical/architecture.md
//!
//! Assets
//!     logo.png
//!
//! Config
//!     docgen.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Team Docs → index.html
//!     001 Getting Started → getting-started.html
//!     Technical Notes → technical/index.html
//!         001 Architecture → technical/architecture.html
//!
//! Generated 2 pages, 2 index pages, 1 asset
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::CONFIG_FILE;
use crate::generate::{GenerateReport, PageKind};
use crate::naming::parent_path;
use crate::scan::{Manifest, Section};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `3 pages`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Format an entity header: positional index + title, with optional page count.
///
/// ```text
/// 001 Technical Notes (2 pages)
/// 002 Setup Guide
/// ```
fn entity_header(index: usize, title: &str, pages: Option<usize>) -> String {
    match pages {
        Some(n) => format!("{} {} ({})", format_index(index), title, plural(n, "page")),
        None => format!("{} {}", format_index(index), title),
    }
}

fn source_dir(section: &Section) -> String {
    if section.is_root() {
        "./".to_string()
    } else {
        format!("{}/", section.path)
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered section tree.
pub fn format_scan_output(manifest: &Manifest, has_config_file: bool) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    format_section(&manifest.root, 1, 0, &mut lines);

    if !manifest.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &manifest.assets {
            lines.push(format!("    {}", asset.path));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if has_config_file {
        lines.push(format!("    {}", CONFIG_FILE));
    } else {
        lines.push("    (defaults)".to_string());
    }
    if let Some(dir) = &manifest.config.template_dir {
        lines.push(format!("    template: {}/", dir));
    }

    lines
}

fn format_section(section: &Section, position: usize, depth: usize, lines: &mut Vec<String>) {
    let base_indent = indent(depth);
    let header = entity_header(position, &section.title, Some(section.documents.len()));
    lines.push(format!("{}{}", base_indent, header));
    lines.push(format!("{}    Source: {}", base_indent, source_dir(section)));
    if let Some(landing) = &section.landing {
        lines.push(format!("{}    Landing: {}", base_indent, landing.source_path));
    }

    for (i, doc) in section.documents.iter().enumerate() {
        lines.push(format!(
            "{}    {}",
            base_indent,
            entity_header(i + 1, &doc.title, None)
        ));
        lines.push(format!("{}        Source: {}", base_indent, doc.source_path));
    }

    for (i, child) in section.sections.iter().enumerate() {
        format_section(child, i + 1, depth + 1, lines);
    }
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, has_config_file: bool) {
    for line in format_scan_output(manifest, has_config_file) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output showing written HTML files.
///
/// Index pages show their title and path; document pages are numbered
/// within their directory and indented one level below its index.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;
    let mut current_dir: Option<&str> = None;

    for page in &report.pages {
        match page.kind {
            PageKind::Index => {
                lines.push(format!(
                    "{}{} \u{2192} {}",
                    indent(page.depth),
                    page.title,
                    page.path
                ));
            }
            PageKind::Document => {
                let dir = parent_path(&page.path);
                if current_dir != Some(dir) {
                    current_dir = Some(dir);
                    position = 0;
                }
                position += 1;
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    indent(page.depth + 1),
                    format_index(position),
                    page.title,
                    page.path
                ));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.count(PageKind::Document), "page"),
        plural(report.count(PageKind::Index), "index page"),
        plural(report.assets, "asset")
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
