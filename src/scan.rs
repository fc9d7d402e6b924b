//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Walks the source tree and sorts every entry
//! into one of two buckets: markdown documents, which become pages, and raw
//! assets, which are copied verbatim.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Source root
//! ├── docgen.toml                  # Site configuration (optional)
//! ├── getting-started.md           # → getting-started.html
//! ├── logo.png                     # Raw asset → logo.png
//! ├── technical/                   # Section → technical/index.html
//! │   ├── index.md                 # Landing document (top of the index page)
//! │   ├── Architecture.md          # → technical/architecture.html
//! │   └── tools/
//! │       ├── 010-overview.md      # Numbered: sorted first
//! │       └── Setup_Guide.md       # → technical/tools/setup-guide.html
//! └── downloads/                   # No markdown: copied, no index page
//!     └── report.txt
//! ```
//!
//! ## Output
//!
//! Produces a [`Manifest`] containing:
//! - The section tree (directories that contain markdown, transitively)
//! - Every document, placed in its section and ordered
//! - Every raw asset
//! - The resolved site configuration
//!
//! ## Validation
//!
//! Two sources that would be written to the same output path (for example
//! `Setup Guide.md` and `setup-guide.md` in one directory) are rejected.

use crate::config::{self, SiteConfig};
use crate::markdown::extract_title;
use crate::naming::{is_markdown, join_path, parent_path, parse_entry_name};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{first} and {second} would both be written to {output}")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub root: Section,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    pub config: SiteConfig,
}

impl Manifest {
    /// All sections, depth-first, parents before children.
    pub fn sections(&self) -> Vec<&Section> {
        let mut out = Vec::new();
        self.root.collect_sections(&mut out);
        out
    }

    /// All documents rendered as standalone pages, in section order.
    ///
    /// Landing documents are rendered into their section's index page and
    /// are not included.
    pub fn documents(&self) -> Vec<&Document> {
        self.sections()
            .into_iter()
            .flat_map(|s| s.documents.iter())
            .collect()
    }
}

/// A source directory that contributes pages to the site.
#[derive(Debug, Serialize)]
pub struct Section {
    /// Path relative to the source root, `/`-separated. Empty for the root.
    pub path: String,
    /// Landing document title, else the directory's display title.
    /// The root section uses the configured site title.
    pub title: String,
    #[serde(skip)]
    pub sort_key: u32,
    /// The directory's `index.md` when index pages are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing: Option<Document>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Section {
    /// Output path of this section's index page.
    pub fn index_path(&self) -> String {
        join_path(&self.path, "index.html")
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// No landing document, no documents, no child sections. Only the root
    /// section can be empty.
    pub fn is_empty(&self) -> bool {
        self.landing.is_none() && self.documents.is_empty() && self.sections.is_empty()
    }

    fn collect_sections<'a>(&'a self, out: &mut Vec<&'a Section>) {
        out.push(self);
        for child in &self.sections {
            child.collect_sections(out);
        }
    }
}

/// A markdown source file and the page it becomes.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Source path relative to the source root.
    pub source_path: String,
    /// Output path relative to the output root (mirrored dir + `<slug>.html`).
    pub output_path: String,
    /// Output file stem: the source stem, lowercased and hyphenated.
    pub slug: String,
    /// First `# heading`, else the display title of the file stem.
    pub title: String,
    #[serde(skip)]
    pub sort_key: u32,
    /// Raw markdown text.
    #[serde(skip)]
    pub markdown: String,
}

/// A non-markdown file copied verbatim. Source and output paths are equal.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub path: String,
}

#[derive(Default)]
struct SectionBuilder {
    landing: Option<Document>,
    documents: Vec<Document>,
}

/// Scan `root` into a manifest.
///
/// `output_dir` is skipped when it lives inside the source tree, so building
/// into `docs/site` never picks up a previous build's output.
pub fn scan(root: &Path, output_dir: &Path) -> Result<Manifest, ScanError> {
    scan_with_template(root, output_dir, None)
}

/// Like [`scan`], also skipping a template directory given on the command
/// line (relative to the working directory, not the source root).
pub fn scan_with_template(
    root: &Path,
    output_dir: &Path,
    template_dir: Option<&Path>,
) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let config = config::load_config(root)?;
    let skipped = skipped_dirs(root, output_dir, template_dir, &config)?;

    let mut builders: BTreeMap<String, SectionBuilder> = BTreeMap::new();
    builders.insert(String::new(), SectionBuilder::default());
    let mut assets = Vec::new();
    let mut outputs: HashMap<String, String> = HashMap::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep_entry(e, &config, &skipped));

    for entry in walker {
        let entry = entry?;
        let rel = relative_path(entry.path(), root);

        if entry.file_type().is_dir() {
            builders.entry(rel).or_default();
            continue;
        }

        if is_markdown(entry.path()) {
            let document = read_document(entry.path(), &rel)?;
            debug!(source = %rel, output = %document.output_path, "document");

            let section = builders.entry(parent_path(&rel).to_string()).or_default();
            if config.indexes && document.slug == "index" {
                // Rendered into the generated index page, checked against it below
                if let Some(first) = &section.landing {
                    return Err(ScanError::DuplicateOutput {
                        output: document.output_path,
                        first: first.source_path.clone(),
                        second: rel,
                    });
                }
                section.landing = Some(document);
            } else {
                claim_output(&mut outputs, &document.output_path, &rel)?;
                section.documents.push(document);
            }
        } else {
            claim_output(&mut outputs, &rel, &rel)?;
            debug!(path = %rel, "asset");
            assets.push(Asset { path: rel });
        }
    }

    let root_section = assemble_section("", &mut builders, &config).unwrap_or_else(|| Section {
        path: String::new(),
        title: config.site_title.clone(),
        sort_key: 0,
        landing: None,
        documents: Vec::new(),
        sections: Vec::new(),
    });

    let manifest = Manifest {
        root: root_section,
        assets,
        config,
    };

    if manifest.config.indexes {
        for section in manifest.sections().into_iter().filter(|s| !s.is_empty()) {
            let index = section.index_path();
            if let Some(source) = outputs.get(&index) {
                return Err(ScanError::DuplicateOutput {
                    output: index,
                    first: source.clone(),
                    second: format!("the generated index of {:?}", section.title),
                });
            }
        }
    }

    Ok(manifest)
}

/// Relative directories the walk must not enter: the output directory and
/// the template directories, when any of them lives inside the source root.
fn skipped_dirs(
    root: &Path,
    output_dir: &Path,
    template_override: Option<&Path>,
    config: &SiteConfig,
) -> Result<Vec<PathBuf>, ScanError> {
    let abs_root = absolute_path(root)?;
    let mut candidates = vec![absolute_path(output_dir)?];
    if let Some(template_dir) = &config.template_dir {
        candidates.push(absolute_path(&root.join(template_dir))?);
    }
    if let Some(template_dir) = template_override {
        candidates.push(absolute_path(template_dir)?);
    }

    Ok(candidates
        .into_iter()
        .filter_map(|dir| dir.strip_prefix(&abs_root).ok().map(Path::to_path_buf))
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(|rel| root.join(rel))
        .collect())
}

/// Canonical path when it exists, else an absolute path without touching
/// the filesystem.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        fs::canonicalize(path)
    } else {
        std::path::absolute(path)
    }
}

fn keep_entry(entry: &DirEntry, config: &SiteConfig, skipped: &[PathBuf]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || config.is_excluded(&name) {
        return false;
    }
    if entry.depth() == 1 && name == config::CONFIG_FILE && entry.file_type().is_file() {
        return false;
    }
    !(entry.file_type().is_dir() && skipped.iter().any(|dir| dir == entry.path()))
}

fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_document(path: &Path, rel: &str) -> Result<Document, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);

    let markdown = fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let title = extract_title(&markdown).unwrap_or_else(|| parsed.display_title.clone());
    let output_path = join_path(parent_path(rel), &format!("{}.html", parsed.slug));

    Ok(Document {
        source_path: rel.to_string(),
        output_path,
        sort_key: parsed.sort_key(),
        slug: parsed.slug,
        title,
        markdown,
    })
}

fn claim_output(
    outputs: &mut HashMap<String, String>,
    output: &str,
    source: &str,
) -> Result<(), ScanError> {
    if let Some(first) = outputs.get(output) {
        return Err(ScanError::DuplicateOutput {
            output: output.to_string(),
            first: first.clone(),
            second: source.to_string(),
        });
    }
    outputs.insert(output.to_string(), source.to_string());
    Ok(())
}

/// Build the section at `path` and its descendants from the collected
/// builders. Returns `None` for non-root sections with nothing to show.
fn assemble_section(
    path: &str,
    builders: &mut BTreeMap<String, SectionBuilder>,
    config: &SiteConfig,
) -> Option<Section> {
    let builder = builders.remove(path).unwrap_or_default();

    let child_paths: Vec<String> = builders
        .keys()
        .filter(|k| parent_path(k) == path)
        .cloned()
        .collect();

    let mut sections: Vec<Section> = child_paths
        .iter()
        .filter_map(|child| assemble_section(child, builders, config))
        .collect();
    sections.sort_by(|a, b| (a.sort_key, &a.path).cmp(&(b.sort_key, &b.path)));

    let mut documents = builder.documents;
    documents.sort_by(|a, b| (a.sort_key, &a.slug).cmp(&(b.sort_key, &b.slug)));

    let is_root = path.is_empty();
    if !is_root && builder.landing.is_none() && documents.is_empty() && sections.is_empty() {
        return None;
    }

    let dir_name = path.rsplit('/').next().unwrap_or(path);
    let parsed = parse_entry_name(dir_name);
    let mut landing = builder.landing;
    let title = if is_root {
        config.site_title.clone()
    } else {
        // A landing without a heading would otherwise be titled "index"
        let title = landing
            .as_ref()
            .and_then(|d| extract_title(&d.markdown))
            .unwrap_or_else(|| parsed.display_title.clone());
        if let Some(doc) = landing.as_mut() {
            doc.title = title.clone();
        }
        title
    };

    Some(Section {
        path: path.to_string(),
        title,
        sort_key: if is_root { 0 } else { parsed.sort_key() },
        landing,
        documents,
        sections,
    })
}
