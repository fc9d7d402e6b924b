//! Up/downstream navigation between pages.
//!
//! Every href is relative to the page it appears on, so a generated site
//! can be browsed straight from disk (`file://`) or served from any URL
//! prefix.
//!
//! - **Document pages**: breadcrumb of ancestor index pages, an up link to
//!   the section index, previous/next links to sibling documents.
//! - **Index pages**: breadcrumb, an up link to the parent index, previous/next
//!   links to sibling sections, and the doc set itself: links to the
//!   section's documents and to each subsection's index.

use crate::scan::Section;
use maud::{Markup, PreEscaped, html};

/// A navigation link: display title plus a page-relative href.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub title: String,
    pub href: String,
}

/// Navigation links for a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageNav {
    pub breadcrumb: Vec<Link>,
    pub up: Option<Link>,
    pub prev: Option<Link>,
    pub next: Option<Link>,
}

impl PageNav {
    pub fn is_empty(&self) -> bool {
        self.breadcrumb.is_empty() && self.up.is_none() && self.prev.is_none() && self.next.is_none()
    }
}

/// Href from a page in directory `from_dir` to the site path `to`.
///
/// Both arguments are relative to the site root and `/`-separated;
/// `from_dir` is empty at the root.
pub fn relative_href(from_dir: &str, to: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let target: Vec<&str> = to.split('/').collect();
    let (target_dirs, file) = target.split_at(target.len() - 1);

    let common = from
        .iter()
        .zip(target_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut href = "../".repeat(from.len() - common);
    for dir in &target_dirs[common..] {
        href.push_str(dir);
        href.push('/');
    }
    href.push_str(file[0]);
    href
}

fn index_link(from_dir: &str, section: &Section) -> Link {
    Link {
        title: section.title.clone(),
        href: relative_href(from_dir, &section.index_path()),
    }
}

/// Navigation for the document at `position` in `section`.
///
/// `ancestors` runs from the root down to the section's parent. Without
/// index pages there is nothing upstream to link to, so only sibling links
/// remain.
pub fn document_nav(
    ancestors: &[&Section],
    section: &Section,
    position: usize,
    indexes: bool,
) -> PageNav {
    let here = section.path.as_str();
    let doc_link = |i: usize| {
        section.documents.get(i).map(|doc| Link {
            title: doc.title.clone(),
            href: relative_href(here, &doc.output_path),
        })
    };

    let (breadcrumb, up) = if indexes {
        let breadcrumb: Vec<Link> = ancestors
            .iter()
            .copied()
            .chain(std::iter::once(section))
            .map(|s| index_link(here, s))
            .collect();
        (breadcrumb, Some(index_link(here, section)))
    } else {
        (Vec::new(), None)
    };

    PageNav {
        breadcrumb,
        up,
        prev: position.checked_sub(1).and_then(doc_link),
        next: doc_link(position + 1),
    }
}

/// Navigation for the index page of `siblings[position]`.
///
/// `ancestors` runs from the root down to the section's parent; `siblings`
/// is the parent's child list (or just the root).
pub fn index_nav(ancestors: &[&Section], siblings: &[Section], position: usize) -> PageNav {
    let here = siblings[position].path.as_str();
    let sibling_link = |i: usize| siblings.get(i).map(|s| index_link(here, s));

    PageNav {
        breadcrumb: ancestors.iter().map(|s| index_link(here, s)).collect(),
        up: ancestors.last().map(|s| index_link(here, s)),
        prev: position.checked_sub(1).and_then(sibling_link),
        next: sibling_link(position + 1),
    }
}

/// Renders the navigation block placed in the template's `{{ nav }}` slot.
pub fn render_page_nav(nav: &PageNav) -> Markup {
    html! {
        @if !nav.is_empty() {
            nav.page-nav aria-label="Page navigation" {
                @if !nav.breadcrumb.is_empty() {
                    ol.breadcrumb {
                        @for link in &nav.breadcrumb {
                            li { a href=(link.href) { (link.title) } }
                        }
                    }
                }
                @if nav.up.is_some() || nav.prev.is_some() || nav.next.is_some() {
                    ul.page-links {
                        @if let Some(prev) = &nav.prev {
                            li.prev { a href=(prev.href) rel="prev" { "← " (prev.title) } }
                        }
                        @if let Some(up) = &nav.up {
                            li.up { a href=(up.href) { "↑ " (up.title) } }
                        }
                        @if let Some(next) = &nav.next {
                            li.next { a href=(next.href) rel="next" { (next.title) " →" } }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the body of a section's index page: the landing document (or a
/// heading), then the doc set.
pub fn render_index_body(section: &Section, landing_html: Option<&str>) -> Markup {
    let here = section.path.as_str();

    html! {
        article.index-page {
            @if let Some(landing) = landing_html {
                div.landing { (PreEscaped(landing)) }
            } @else {
                h1 { (section.title) }
            }
            @if !section.documents.is_empty() {
                div.doc-set {
                    h2 { "Pages" }
                    ul {
                        @for doc in &section.documents {
                            li { a href=(relative_href(here, &doc.output_path)) { (doc.title) } }
                        }
                    }
                }
            }
            @if !section.sections.is_empty() {
                div.subsections {
                    h2 { "Sections" }
                    ul {
                        @for child in &section.sections {
                            li { a href=(relative_href(here, &child.index_path())) { (child.title) } }
                        }
                    }
                }
            }
        }
    }
}
