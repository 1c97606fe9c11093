use super::entry::BibEntry;
use std::cmp::Ordering;

/// Fields left out of the copied BibTeX by default.
pub const DEFAULT_EXCLUDED_FIELDS: [&str; 2] = ["file", "keywords"];

/// Renders an entry back to BibTeX, one field per line, skipping `exclude`.
pub fn format_bibtex<S: AsRef<str>>(entry: &BibEntry, exclude: &[S]) -> String {
    let mut output = format!("@{}{{{}", entry.entry_type, entry.key);

    for (name, value) in &entry.fields {
        if exclude.iter().any(|e| e.as_ref().eq_ignore_ascii_case(name)) {
            continue;
        }
        output.push_str(&format!(",\n{} = {{{}}}", name, value));
    }

    output.push_str("\n}");
    output
}

/// `"Smith, John and Jane Doe"` becomes `"Smith, J., Doe, J."`.
pub fn format_authors(authors: &str) -> String {
    authors
        .split(" and ")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(format_author)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_author(author: &str) -> String {
    if author == "others" {
        return "et al.".to_string();
    }

    let (last, first) = match author.split_once(',') {
        Some((last, first)) => (last.trim().to_string(), first.trim().to_string()),
        None => {
            let names: Vec<&str> = author.split_whitespace().collect();
            match names.split_last() {
                Some((last, rest)) => (last.to_string(), rest.join(" ")),
                None => return String::new(),
            }
        }
    };

    let last = strip_braces(&last);
    let initials = initials(&first);
    if initials.is_empty() {
        last
    } else {
        format!("{}, {}", last, initials)
    }
}

fn initials(first: &str) -> String {
    first
        .split_whitespace()
        .filter_map(|name| strip_braces(name).chars().next())
        .map(|c| format!("{c}."))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops grouping braces. An escaped `\{` or `\}` becomes a literal brace.
pub fn strip_braces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some('{' | '}')) => {
                if let Some(brace) = chars.next() {
                    out.push(brace);
                }
            }
            '{' | '}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Link for an entry: the DOI resolver URL when a `doi` is set, otherwise `url`.
pub fn extract_url(entry: &BibEntry) -> Option<String> {
    if let Some(doi) = entry.get("doi").map(str::trim).filter(|d| !d.is_empty()) {
        if doi.starts_with("http://") || doi.starts_with("https://") {
            return Some(doi.to_string());
        }
        return Some(format!("https://doi.org/{doi}"));
    }
    entry
        .get("url")
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

/// Comma-separated `keywords` field, trimmed, empty items dropped.
pub fn extract_keywords(entry: &BibEntry) -> Vec<String> {
    entry
        .get("keywords")
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keeps entries tagged with at least one of `keywords`. An empty filter
/// keeps everything.
pub fn filter_by_keywords<'a, S: AsRef<str>>(
    entries: &'a [BibEntry],
    keywords: &[S],
) -> Vec<&'a BibEntry> {
    if keywords.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| {
            let tags = extract_keywords(entry);
            keywords.iter().any(|k| tags.iter().any(|t| t == k.as_ref()))
        })
        .collect()
}

/// Publication order: newest year first, then first author's last name.
pub fn sort_entries(entries: &mut [&BibEntry]) {
    entries.sort_by(|a, b| compare_entries(a, b));
}

fn compare_entries(a: &BibEntry, b: &BibEntry) -> Ordering {
    let year_a = a.year().unwrap_or(0);
    let year_b = b.year().unwrap_or(0);
    year_b
        .cmp(&year_a)
        .then_with(|| first_author_last_name(a).cmp(&first_author_last_name(b)))
}

fn first_author_last_name(entry: &BibEntry) -> String {
    let authors = entry.get("author").unwrap_or("");
    let first = authors.split(" and ").next().unwrap_or("").trim();
    let last = match first.split_once(',') {
        Some((last, _)) => last.trim(),
        None => first.split_whitespace().last().unwrap_or(""),
    };
    strip_braces(last).to_lowercase()
}

/// One-line plain reference: `Authors (Year). Title. Venue, Volume(Number), Pages. Link`
pub fn format_reference(entry: &BibEntry) -> String {
    let authors = format_authors(entry.get("author").unwrap_or(""));
    let year = entry.get("year").unwrap_or("n.d.");
    let title = strip_braces(entry.get("title").unwrap_or("")).replace("--", "-");

    let mut output = if authors.is_empty() {
        format!("({}). {}", year, title)
    } else {
        format!("{} ({}). {}", authors, year, title)
    };
    if !title.ends_with(['.', '?', '!']) {
        output.push('.');
    }

    let journal = entry.get("journal").unwrap_or("");
    let booktitle = entry.get("booktitle").unwrap_or("");
    let volume = entry.get("volume").unwrap_or("");
    let number = entry.get("number").unwrap_or("");
    let pages = entry.get("pages").unwrap_or("").replace("--", "-");
    let publisher = entry.get("publisher").unwrap_or("");

    let venue = if !journal.is_empty() { journal } else { booktitle };
    let mut tail = strip_braces(venue).replace("--", "-");
    if !volume.is_empty() {
        push_separated(&mut tail, volume);
    }
    if !number.is_empty() {
        tail.push_str(&format!("({})", number));
    }
    if !pages.is_empty() && !venue.is_empty() {
        push_separated(&mut tail, &pages);
    }
    if !publisher.is_empty() {
        push_separated(&mut tail, &strip_braces(publisher));
    }

    if !tail.is_empty() {
        output.push(' ');
        output.push_str(&tail);
        output.push('.');
    }
    if let Some(url) = extract_url(entry) {
        output.push(' ');
        output.push_str(&url);
    }
    output
}

fn push_separated(tail: &mut String, part: &str) {
    if !tail.is_empty() {
        tail.push_str(", ");
    }
    tail.push_str(part);
}
