//! Shared test utilities for the docgen test suite.
//!
//! Provides fixture setup, lookup helpers, and section tree assertions that
//! work with scan-phase data structures (`Manifest`, `Section`, `Document`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path(), &tmp.path().join("site")).unwrap();
//!
//! let guide = find_document(&manifest, "technical/tools/Setup_Guide.md");
//! assert_eq!(guide.slug, "setup-guide");
//!
//! assert_section_shape(&manifest, &[
//!     ("", "Team Docs"),
//!     ("technical", "Technical Notes"),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::{Document, Manifest, Section};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Read a generated file relative to the output root. Panics if missing.
pub fn read_output(output_dir: &Path, rel: &str) -> String {
    std::fs::read_to_string(output_dir.join(rel))
        .unwrap_or_else(|e| panic!("cannot read output '{rel}': {e}"))
}

// =========================================================================
// Manifest lookups, panicking with a clear message on miss
// =========================================================================

/// Find a document (landing documents included) by source path.
pub fn find_document<'a>(manifest: &'a Manifest, source_path: &str) -> &'a Document {
    let all = all_documents(manifest);
    all.iter()
        .copied()
        .find(|d| d.source_path == source_path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = all.iter().map(|d| d.source_path.as_str()).collect();
            panic!("document '{source_path}' not found. Available: {paths:?}")
        })
}

fn all_documents(manifest: &Manifest) -> Vec<&Document> {
    manifest
        .sections()
        .into_iter()
        .flat_map(|s| s.landing.iter().chain(s.documents.iter()))
        .collect()
}

/// Find a section by path (`""` for the root). Panics if not found.
pub fn find_section<'a>(manifest: &'a Manifest, path: &str) -> &'a Section {
    let sections = manifest.sections();
    sections
        .iter()
        .copied()
        .find(|s| s.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = sections.iter().map(|s| s.path.as_str()).collect();
            panic!("section '{path}' not found. Available: {paths:?}")
        })
}

// =========================================================================
// Section tree helpers
// =========================================================================

/// `(path, title)` for every section, parents before children.
pub fn section_shape(manifest: &Manifest) -> Vec<(&str, &str)> {
    manifest
        .sections()
        .into_iter()
        .map(|s| (s.path.as_str(), s.title.as_str()))
        .collect()
}

/// Assert that the section tree, flattened depth-first, matches `expected`.
///
/// ```rust
/// assert_section_shape(&manifest, &[
///     ("", "Team Docs"),
///     ("guides", "guides"),
/// ]);
/// ```
pub fn assert_section_shape(manifest: &Manifest, expected: &[(&str, &str)]) {
    assert_eq!(
        section_shape(manifest),
        expected.to_vec(),
        "section tree mismatch"
    );
}
