//! LaTeX escapes to Unicode.
//!
//! Covers what shows up in hand-maintained bibliographies: accent commands,
//! a handful of special letters and escaped punctuation. Math and unknown
//! commands pass through unchanged.

/// Accent command, base letters, precomposed results (same order).
const ACCENTS: &[(char, &str, &str)] = &[
    ('"', "aeiouyAEIOUY", "äëïöüÿÄËÏÖÜŸ"),
    ('\'', "aeiouyAEIOUYcnszCNSZ", "áéíóúýÁÉÍÓÚÝćńśźĆŃŚŹ"),
    ('`', "aeiouAEIOU", "àèìòùÀÈÌÒÙ"),
    ('^', "aeiouAEIOU", "âêîôûÂÊÎÔÛ"),
    ('~', "anoANO", "ãñõÃÑÕ"),
    ('=', "aeiouAEIOU", "āēīōūĀĒĪŌŪ"),
    ('.', "zZeEI", "żŻėĖİ"),
    ('c', "cCsStT", "çÇşŞţŢ"),
    ('v', "csznreCSZNRE", "čšžňřěČŠŽŇŘĚ"),
    ('u', "aAgG", "ăĂğĞ"),
    ('H', "oOuU", "őŐűŰ"),
    ('k', "aAeE", "ąĄęĘ"),
    ('r', "aAuU", "åÅůŮ"),
];

const COMBINING: &[(char, char)] = &[
    ('"', '\u{308}'),
    ('\'', '\u{301}'),
    ('`', '\u{300}'),
    ('^', '\u{302}'),
    ('~', '\u{303}'),
    ('=', '\u{304}'),
    ('.', '\u{307}'),
    ('c', '\u{327}'),
    ('v', '\u{30C}'),
    ('u', '\u{306}'),
    ('H', '\u{30B}'),
    ('k', '\u{328}'),
    ('r', '\u{30A}'),
    ('d', '\u{323}'),
    ('b', '\u{331}'),
];

const LETTERS: &[(&str, &str)] = &[
    ("ss", "ß"),
    ("o", "ø"),
    ("O", "Ø"),
    ("ae", "æ"),
    ("AE", "Æ"),
    ("oe", "œ"),
    ("OE", "Œ"),
    ("aa", "å"),
    ("AA", "Å"),
    ("l", "ł"),
    ("L", "Ł"),
    ("i", "ı"),
    ("j", "ȷ"),
];

pub fn to_unicode(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        if matches!(next, '&' | '%' | '$' | '_' | '#') {
            out.push(next);
            i += 2;
            continue;
        }

        // Escaped braces stay escaped; `format_bibtex` wraps values in braces.
        if matches!(next, '{' | '}') {
            out.push('\\');
            out.push(next);
            i += 2;
            continue;
        }

        if is_accent(next) && !next.is_ascii_alphabetic() {
            let (base, consumed) = read_argument(&chars, i + 2);
            out.push_str(&apply_accent(next, &base));
            i += 2 + consumed;
            continue;
        }

        let name: String = chars[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if name.is_empty() {
            out.push('\\');
            i += 1;
            continue;
        }
        let after_name = i + 1 + name.len();

        if let Some(accent) = single_letter_accent(&name) {
            let mut start = after_name;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
            let (base, consumed) = read_argument(&chars, start);
            if !base.is_empty() {
                out.push_str(&apply_accent(accent, &base));
                i = start + consumed;
                continue;
            }
        }

        if let Some((_, letter)) = LETTERS.iter().find(|(n, _)| *n == name) {
            out.push_str(letter);
            i = after_name;
            // A control word swallows one following space.
            if i < chars.len() && chars[i] == ' ' {
                i += 1;
            }
            continue;
        }

        out.push('\\');
        out.push_str(&name);
        i = after_name;
    }

    strip_single_char_groups(&out)
}

fn is_accent(c: char) -> bool {
    ACCENTS.iter().any(|(a, _, _)| *a == c) || COMBINING.iter().any(|(a, _)| *a == c)
}

fn single_letter_accent(name: &str) -> Option<char> {
    let mut chars = name.chars();
    let c = chars.next()?;
    if chars.next().is_none() && c.is_ascii_alphabetic() && is_accent(c) {
        Some(c)
    } else {
        None
    }
}

/// Reads `{x}`, `{\i}` or a bare character. Returns the base text and the
/// number of chars consumed.
fn read_argument(chars: &[char], start: usize) -> (String, usize) {
    match chars.get(start) {
        Some('{') => {
            let end = chars[start + 1..]
                .iter()
                .position(|&c| c == '}')
                .map(|p| start + 1 + p);
            match end {
                Some(end) => {
                    let inner: String = chars[start + 1..end].iter().collect();
                    (dotless(&inner), end + 1 - start)
                }
                None => (String::new(), 0),
            }
        }
        Some('\\') => {
            let name: String = chars[start + 1..]
                .iter()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect();
            (dotless(&format!("\\{name}")), 1 + name.len())
        }
        Some(&c) if !c.is_whitespace() && c != '}' => (c.to_string(), 1),
        _ => (String::new(), 0),
    }
}

fn dotless(base: &str) -> String {
    match base.trim() {
        "\\i" => "i".to_string(),
        "\\j" => "j".to_string(),
        other => other.to_string(),
    }
}

fn apply_accent(accent: char, base: &str) -> String {
    let mut chars = base.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest: String = chars.collect();

    if let Some((_, bases, composed)) = ACCENTS.iter().find(|(a, _, _)| *a == accent) {
        if let Some(idx) = bases.chars().position(|c| c == first) {
            if let Some(c) = composed.chars().nth(idx) {
                return format!("{c}{rest}");
            }
        }
    }

    match COMBINING.iter().find(|(a, _)| *a == accent) {
        Some((_, mark)) => format!("{first}{mark}{rest}"),
        None => base.to_string(),
    }
}

/// Drops braces around a single non-ASCII character, e.g. `{ö}` left over
/// from `{\"o}`.
fn strip_single_char_groups(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let escaped = i > 0 && chars[i - 1] == '\\';
        if chars[i] == '{'
            && !escaped
            && i + 2 < chars.len()
            && chars[i + 2] == '}'
            && !chars[i + 1].is_ascii()
        {
            out.push(chars[i + 1]);
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
