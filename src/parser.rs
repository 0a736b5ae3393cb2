use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use rayon::prelude::*;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::record::FacultyRecord;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".node__title").unwrap());
static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".text__body").unwrap());
static DISCIPLINE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".node__discipline p").unwrap());

/// Elements that start a new line when rendered; their text never runs into a neighbour's.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Pull name, bio and discipline out of a faculty directory page.
///
/// Never fails: a selector that matches nothing yields an empty string.
pub fn extract(html: &str) -> FacultyRecord {
    let doc = Html::parse_document(html);
    FacultyRecord {
        name: first_text(&doc, &TITLE_SEL),
        biography: first_text(&doc, &BODY_SEL),
        discipline: first_text(&doc, &DISCIPLINE_SEL),
    }
}

fn first_text(doc: &Html, sel: &Selector) -> String {
    doc.select(sel)
        .next()
        .map(|el| {
            let mut raw = String::new();
            render_text(el, &mut raw);
            collapse_whitespace(&raw)
        })
        .unwrap_or_default()
}

/// Concatenate descendant text, breaking at block boundaries and `<br>`.
fn render_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let block = BLOCK_TAGS.contains(&child_el.value().name());
            if block {
                out.push(' ');
            }
            render_text(child_el, out);
            if block {
                out.push(' ');
            }
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read saved profile pages (or `.txt` dumps) into records.
///
/// Blank files are skipped. Output follows input order.
pub fn load_records(paths: &[PathBuf]) -> Result<Vec<FacultyRecord>> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            debug!("Skipping blank file {}", path.display());
            continue;
        }
        docs.push((path.as_path(), contents));
    }

    docs.par_iter()
        .map(|(path, contents)| record_from_file(path, contents))
        .collect()
}

fn record_from_file(path: &Path, contents: &str) -> Result<FacultyRecord> {
    let is_dump = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if is_dump {
        FacultyRecord::from_text(contents)
            .with_context(|| format!("Malformed profile dump {}", path.display()))
    } else {
        Ok(extract(contents))
    }
}

// ── Tests ──
