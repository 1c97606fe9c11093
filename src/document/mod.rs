//! Documents that citation elements are looked up in.

pub mod bib;
pub mod html;

pub use bib::BibDocument;
pub use html::HtmlDocument;

use anyhow::Result;
use std::path::Path;

/// Result of resolving an element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    NotFound,
}

pub trait Document: Send + Sync {
    /// Text content of the element named `id`.
    fn lookup(&self, id: &str) -> Lookup;
}

impl<T: Document + ?Sized> Document for Box<T> {
    fn lookup(&self, id: &str) -> Lookup {
        (**self).lookup(id)
    }
}

/// Opens `path` as an HTML page (`.html`, `.htm`) or as a BibTeX database.
pub fn open<S: AsRef<str>>(path: &Path, exclude_fields: &[S]) -> Result<Box<dyn Document>> {
    if is_html(path) {
        Ok(Box::new(HtmlDocument::load(path)?))
    } else {
        Ok(Box::new(BibDocument::load(path, exclude_fields)?))
    }
}

pub fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}
