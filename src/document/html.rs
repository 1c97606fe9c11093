use super::{Document, Lookup};
use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// An HTML page indexed by element id. Text follows DOM `textContent`:
/// every descendant text run, concatenated, whitespace untouched.
///
/// Parsing uses an HTML5 tree builder: implied end tags and a bare `<` in
/// text resolve as they do in a browser.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    elements: HashMap<String, String>,
}

impl HtmlDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(html: &str) -> Self {
        let page = Html::parse_document(html);
        if !page.errors.is_empty() {
            debug!(count = page.errors.len(), "html parse errors recovered");
        }

        let mut elements: HashMap<String, String> = HashMap::new();
        for node in page.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            if let Some(id) = element.value().id() {
                elements
                    .entry(id.to_string())
                    .or_insert_with(|| element.text().collect());
            }
        }

        debug!(ids = elements.len(), "indexed html document");
        Self { elements }
    }

    /// Element ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Document for HtmlDocument {
    fn lookup(&self, id: &str) -> Lookup {
        match self.elements.get(id) {
            Some(text) => Lookup::Found(text.clone()),
            None => Lookup::NotFound,
        }
    }
}
