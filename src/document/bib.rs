use super::{Document, Lookup};
use crate::bibtex::{self, BibDatabase};
use anyhow::Result;
use std::path::Path;

/// A bibliography where each citation key names one element whose text is
/// the entry rendered as BibTeX.
#[derive(Debug, Clone)]
pub struct BibDocument {
    database: BibDatabase,
    exclude_fields: Vec<String>,
}

impl BibDocument {
    pub fn from_database<S: AsRef<str>>(database: BibDatabase, exclude_fields: &[S]) -> Self {
        Self {
            database,
            exclude_fields: exclude_fields.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    pub fn load<S: AsRef<str>>(path: &Path, exclude_fields: &[S]) -> Result<Self> {
        let database = bibtex::load_bibtex(path)?;
        Ok(Self::from_database(database, exclude_fields))
    }
}

impl Document for BibDocument {
    fn lookup(&self, id: &str) -> Lookup {
        match self.database.find(id) {
            Some(entry) => Lookup::Found(bibtex::format_bibtex(entry, &self.exclude_fields)),
            None => Lookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibtex::{DEFAULT_EXCLUDED_FIELDS, parse_bibtex};
    use pretty_assertions::assert_eq;

    fn sample() -> BibDatabase {
        parse_bibtex(
            r#"
@article{ref1,
  author = {Smith, John},
  title = {Things},
  file = {smith.pdf},
  keywords = {muc.dai},
  year = {2020}
}
@book{ref2, title = {Other}}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_renders_entry_without_excluded_fields() {
        let doc = BibDocument::from_database(sample(), &DEFAULT_EXCLUDED_FIELDS);
        assert_eq!(
            doc.lookup("ref1"),
            Lookup::Found(
                "@article{ref1,\nauthor = {Smith, John},\ntitle = {Things},\nyear = {2020}\n}"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_lookup_missing_key() {
        let doc = BibDocument::from_database(sample(), &DEFAULT_EXCLUDED_FIELDS);
        assert_eq!(doc.lookup("missing"), Lookup::NotFound);
        assert_eq!(doc.lookup("REF1"), Lookup::NotFound);
    }

    #[test]
    fn test_no_exclusions_keeps_all_fields() {
        let doc = BibDocument::from_database::<&str>(sample(), &[]);
        let Lookup::Found(text) = doc.lookup("ref1") else {
            panic!("ref1 should be found");
        };
        assert!(text.contains("file = {smith.pdf}"));
        assert!(text.contains("keywords = {muc.dai}"));
    }
}
