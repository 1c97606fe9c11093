#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Field lookup is case-insensitive; names are stored lower-cased.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a field, replacing an existing value but keeping its position.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.get("year").and_then(|y| y.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BibDatabase {
    pub entries: Vec<BibEntry>,
}

impl BibDatabase {
    pub fn with_entries(entries: Vec<BibEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, key: &str) -> Option<&BibEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
