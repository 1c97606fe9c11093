use super::entry::{BibDatabase, BibEntry};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BibtexError {
    #[error("line {line}: expected {expected}")]
    Expected { line: usize, expected: &'static str },
    #[error("line {line}: unterminated {what}")]
    Unterminated { line: usize, what: &'static str },
}

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parses the entries of a `.bib` file.
///
/// Anything outside an `@type{...}` block is treated as a comment. `@string`
/// macros are expanded in later values, `@comment` and `@preamble` blocks
/// are skipped.
pub fn parse_bibtex(content: &str) -> Result<BibDatabase, BibtexError> {
    let mut parser = Parser::new(content);
    let mut entries = Vec::new();

    while parser.skip_to_entry() {
        let entry_type = parser.read_while(|c| c.is_ascii_alphanumeric());
        parser.skip_whitespace();
        let close = match parser.peek() {
            Some('{') if !entry_type.is_empty() => '}',
            Some('(') if !entry_type.is_empty() => ')',
            _ => {
                // A stray '@' in free text, e.g. an email address.
                continue;
            }
        };
        parser.bump();

        match entry_type.to_lowercase().as_str() {
            "comment" | "preamble" => parser.skip_block(close)?,
            "string" => parser.parse_string_macro(close)?,
            _ => entries.push(parser.parse_entry(&entry_type, close)?),
        }
    }

    debug!(count = entries.len(), "parsed bibtex entries");
    Ok(BibDatabase::with_entries(entries))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    macros: HashMap<String, String>,
}

impl Parser {
    fn new(content: &str) -> Self {
        let macros = MONTHS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            chars: content.chars().collect(),
            pos: 0,
            line: 1,
            macros,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), BibtexError> {
        self.skip_whitespace();
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(BibtexError::Expected {
                line: self.line,
                expected,
            })
        }
    }

    /// Moves past the next '@'. Returns false at end of input.
    fn skip_to_entry(&mut self) -> bool {
        while let Some(c) = self.bump() {
            if c == '@' {
                return true;
            }
        }
        false
    }

    fn skip_block(&mut self, close: char) -> Result<(), BibtexError> {
        let line = self.line;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(BibtexError::Unterminated { line, what: "block" })
    }

    fn parse_string_macro(&mut self, close: char) -> Result<(), BibtexError> {
        self.skip_whitespace();
        let name = self.read_while(is_name_char);
        if name.is_empty() {
            return Err(BibtexError::Expected {
                line: self.line,
                expected: "macro name in @string",
            });
        }
        self.expect('=', "'=' in @string")?;
        let value = self.read_value()?;
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.bump();
        }
        self.expect(close, "end of @string")?;
        self.macros.insert(name.to_lowercase(), value);
        Ok(())
    }

    fn parse_entry(&mut self, entry_type: &str, close: char) -> Result<BibEntry, BibtexError> {
        let start_line = self.line;
        self.skip_whitespace();
        let key = self.read_while(|c| c != ',' && c != close && !c.is_whitespace());
        if key.is_empty() {
            return Err(BibtexError::Expected {
                line: self.line,
                expected: "citation key",
            });
        }

        let mut entry = BibEntry::new(entry_type, key);
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(BibtexError::Unterminated {
                        line: start_line,
                        what: "entry",
                    })
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(entry);
                }
                Some(',') => {
                    self.bump();
                    continue;
                }
                Some(_) => {}
            }

            let name = self.read_while(is_name_char);
            if name.is_empty() {
                return Err(BibtexError::Expected {
                    line: self.line,
                    expected: "field name",
                });
            }
            self.expect('=', "'=' after field name")?;
            let value = self.read_value()?;
            entry.set(&name, value);
        }
    }

    /// Reads a possibly `#`-concatenated value.
    fn read_value(&mut self) -> Result<String, BibtexError> {
        let mut value = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => {
                    self.bump();
                    value.push_str(&self.read_delimited('}', "braced value")?);
                }
                Some('"') => {
                    self.bump();
                    value.push_str(&self.read_delimited('"', "quoted value")?);
                }
                Some(c) if c.is_ascii_digit() => {
                    value.push_str(&self.read_while(|c| c.is_ascii_digit()));
                }
                Some(c) if is_name_char(c) => {
                    let name = self.read_while(is_name_char);
                    match self.macros.get(&name.to_lowercase()) {
                        Some(expanded) => value.push_str(expanded),
                        None => {
                            warn!(line = self.line, name = %name, "undefined string macro");
                            value.push_str(&name);
                        }
                    }
                }
                _ => {
                    return Err(BibtexError::Expected {
                        line: self.line,
                        expected: "field value",
                    })
                }
            }

            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.bump();
            } else {
                return Ok(value.trim().to_string());
            }
        }
    }

    /// Reads up to the matching terminator. Nested braces are kept; a quote
    /// inside braces does not end a quoted value. Whitespace runs collapse to
    /// a single space.
    fn read_delimited(&mut self, end: char, what: &'static str) -> Result<String, BibtexError> {
        let line = self.line;
        let mut depth = 0usize;
        let mut out = String::new();
        let mut pending_space = false;

        while let Some(c) = self.bump() {
            if depth == 0 && c == end {
                if pending_space {
                    out.push(' ');
                }
                return Ok(out);
            }
            match c {
                '{' => depth += 1,
                '}' => {
                    if depth == 0 {
                        return Err(BibtexError::Unterminated { line, what });
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if pending_space {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }

        Err(BibtexError::Unterminated { line, what })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/')
}
