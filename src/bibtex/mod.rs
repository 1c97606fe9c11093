pub mod entry;
pub mod format;
pub mod latex;
pub mod parser;

pub use entry::{BibDatabase, BibEntry};
pub use format::{
    DEFAULT_EXCLUDED_FIELDS, extract_keywords, extract_url, filter_by_keywords, format_authors,
    format_bibtex, format_reference, sort_entries,
};
pub use parser::{BibtexError, parse_bibtex};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a `.bib` file and converts LaTeX escapes in every field to Unicode.
pub fn load_bibtex(path: &Path) -> Result<BibDatabase> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut db = parse_bibtex(&content)
        .with_context(|| format!("Failed to parse BibTeX: {}", path.display()))?;

    for entry in &mut db.entries {
        for (_, value) in &mut entry.fields {
            *value = latex::to_unicode(value);
        }
    }

    debug!(path = %path.display(), entries = db.len(), "loaded bibliography");
    Ok(db)
}
