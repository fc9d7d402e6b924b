//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and a template and
//! writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Document pages** (`{dir}/{slug}.html`): one per markdown source
//! - **Index pages** (`{dir}/index.html`): one per section when `indexes` is
//!   enabled; the landing document (if any) followed by the doc set
//! - **Raw assets**: copied byte-for-byte to the mirrored path
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── index.html                     # Root index
//! ├── getting-started.html
//! ├── logo.png                       # Copied asset
//! └── technical/
//!     ├── index.html                 # Landing (technical/index.md) + doc set
//!     ├── architecture.html
//!     └── tools/
//!         ├── index.html
//!         ├── 010-overview.html
//!         └── setup-guide.html
//! ```
//!
//! The output directory is deleted and recreated on every run, so two builds
//! of the same source produce identical trees.

use crate::markdown::MarkdownRenderer;
use crate::naming::is_markdown;
use crate::nav::{document_nav, index_nav, render_index_body, render_page_nav};
use crate::scan::{Asset, Manifest, Section, absolute_path};
use crate::template::{PageContext, Template};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Refusing to delete {output}: it contains the source directory {source_root}")]
    OutputContainsSource { output: PathBuf, source_root: PathBuf },
    #[error("Refusing to delete {output}: it holds the markdown source {document}")]
    OutputHoldsSources { output: PathBuf, document: PathBuf },
}

/// What kind of page a [`WrittenPage`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Document,
    Index,
}

/// A page written to the output directory.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub kind: PageKind,
    /// Section nesting depth (0 for the root section).
    pub depth: usize,
    pub title: String,
    /// Output path relative to the output root.
    pub path: String,
}

/// Summary of a generate run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<WrittenPage>,
    pub assets: usize,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// Write the site for `manifest` into `output_dir`.
pub fn generate(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    template: &Template,
) -> Result<GenerateReport, GenerateError> {
    prepare_output_dir(source_root, output_dir)?;

    let mut report = GenerateReport {
        assets: copy_assets(&manifest.assets, source_root, output_dir)?,
        ..GenerateReport::default()
    };

    let writer = SiteWriter {
        output_dir,
        template,
        renderer: MarkdownRenderer::new(&manifest.config.markdown),
        site_title: &manifest.config.site_title,
        indexes: manifest.config.indexes,
    };
    let mut ancestors = Vec::new();
    writer.write_section(
        std::slice::from_ref(&manifest.root),
        0,
        &mut ancestors,
        &mut report,
    )?;

    info!(
        pages = report.count(PageKind::Document),
        indexes = report.count(PageKind::Index),
        assets = report.assets,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

/// Delete and recreate the output directory.
///
/// Refuses to touch an output directory that is, or contains, the source,
/// and one inside the source that still holds markdown files. The scan skips
/// such a directory, so its documents would be deleted without being built.
fn prepare_output_dir(source_root: &Path, output_dir: &Path) -> Result<(), GenerateError> {
    let source = absolute_path(source_root)?;
    let output = absolute_path(output_dir)?;
    if source.starts_with(&output) {
        return Err(GenerateError::OutputContainsSource {
            output,
            source_root: source,
        });
    }
    if output.starts_with(&source) && output_dir.is_dir() {
        for entry in WalkDir::new(output_dir) {
            let entry = entry?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                return Err(GenerateError::OutputHoldsSources {
                    output,
                    document: entry.into_path(),
                });
            }
        }
    }

    if output_dir.exists() {
        debug!(output = %output_dir.display(), "removing previous output");
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

fn copy_assets(
    assets: &[Asset],
    source_root: &Path,
    output_dir: &Path,
) -> Result<usize, GenerateError> {
    for asset in assets {
        let dst = output_dir.join(&asset.path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source_root.join(&asset.path), &dst)
            .map_err(|source| GenerateError::Write { path: dst, source })?;
        debug!(path = %asset.path, "copied asset");
    }
    Ok(assets.len())
}

struct SiteWriter<'a> {
    output_dir: &'a Path,
    template: &'a Template,
    renderer: MarkdownRenderer,
    site_title: &'a str,
    indexes: bool,
}

impl SiteWriter<'_> {
    /// Write `siblings[position]`, its documents, and everything below it.
    fn write_section<'m>(
        &self,
        siblings: &'m [Section],
        position: usize,
        ancestors: &mut Vec<&'m Section>,
        report: &mut GenerateReport,
    ) -> Result<(), GenerateError> {
        let section = &siblings[position];
        let depth = ancestors.len();

        if self.indexes && !section.is_empty() {
            let landing_html = section
                .landing
                .as_ref()
                .map(|d| self.renderer.render(&d.markdown));
            let body = render_index_body(section, landing_html.as_deref()).into_string();
            let nav = render_page_nav(&index_nav(ancestors, siblings, position)).into_string();

            let path = section.index_path();
            self.write_page(&path, &section.title, &nav, &body)?;
            report.pages.push(WrittenPage {
                kind: PageKind::Index,
                depth,
                title: section.title.clone(),
                path,
            });
        }

        for (i, doc) in section.documents.iter().enumerate() {
            let body = self.renderer.render(&doc.markdown);
            let nav =
                render_page_nav(&document_nav(ancestors, section, i, self.indexes)).into_string();

            self.write_page(&doc.output_path, &doc.title, &nav, &body)?;
            report.pages.push(WrittenPage {
                kind: PageKind::Document,
                depth,
                title: doc.title.clone(),
                path: doc.output_path.clone(),
            });
        }

        ancestors.push(section);
        for i in 0..section.sections.len() {
            self.write_section(&section.sections, i, ancestors, report)?;
        }
        ancestors.pop();

        Ok(())
    }

    fn write_page(
        &self,
        rel_path: &str,
        title: &str,
        nav: &str,
        content: &str,
    ) -> Result<(), GenerateError> {
        let html = self.template.render(&PageContext {
            title,
            site_title: self.site_title,
            nav,
            content,
        });

        let path = self.output_dir.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %rel_path, "wrote page");
        Ok(())
    }
}
