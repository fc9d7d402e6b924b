//! # docgen
//!
//! A static documentation site generator. Your filesystem is the data source:
//! every markdown file becomes an HTML page at the mirrored path, every other
//! file is copied as-is, and every directory with markdown in it gets an index
//! page linking its documents and subdirectories.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      docs/     →  Manifest   (filesystem → section tree)
//! 2. Generate  Manifest  →  site/      (final HTML site)
//! ```
//!
//! The scan stage reads everything it needs (config, markdown text, asset
//! list) up front and rejects trees that cannot be built, such as two
//! sources that map to the same output file. The generate stage never has
//! to make a decision the scan could have made; it only renders and writes.
//! `docgen scan` prints the manifest as JSON for inspection.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the source directory, produces the [`scan::Manifest`] |
//! | [`generate`] | Stage 2: writes pages and copies assets into the output directory |
//! | [`markdown`] | `pulldown-cmark` rendering, title extraction, `.md` link rewriting |
//! | [`template`] | Base HTML template loading and `{{ token }}` substitution |
//! | [`nav`] | Breadcrumbs, prev/next links, and index page bodies, rendered with Maud |
//! | [`config`] | `docgen.toml` loading, validation, merging, and color CSS generation |
//! | [`naming`] | `NNN-name` prefix parsing and slug rules shared by files and directories |
//! | [`output`] | CLI output formatting for pipeline results |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Mirrored Output
//!
//! `technical/tools/Setup_Guide.md` becomes
//! `technical/tools/setup-guide.html`. Directory names are kept exactly;
//! only the file stem is lowercased and hyphenated. Assets keep their paths
//! untouched, so relative image and download links written in the markdown
//! keep working after the build.
//!
//! ## Relative Links Only
//!
//! Every generated href is relative to the page it appears on. A built site
//! can be opened straight from disk or served under any URL prefix without a
//! `base_url` setting.
//!
//! ## One Template for Every Page
//!
//! Documents and index pages go through the same base template. The built-in
//! one is compiled into the binary; a custom template directory
//! (`base.html`, `styles.css`, `highlight.css`) replaces it wholesale.
//! Substitution is a single pass, so markdown that mentions `{{ content }}`
//! is rendered literally.
//!
//! ## Clean Rebuilds
//!
//! The output directory is deleted and regenerated on every build. There is
//! no incremental mode and no cache, which keeps two builds of the same
//! source byte-identical and leaves no stale pages behind.

pub mod config;
pub mod generate;
pub mod logging;
pub mod markdown;
pub mod naming;
pub mod nav;
pub mod output;
pub mod scan;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
