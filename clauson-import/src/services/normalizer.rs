//! Headword normalization
//!
//! Turns a raw spelling into the canonical key used for sorting and lookup:
//! 1. Strip leading disambiguation numerals ("1 ağ" → "ağ", "1 2 ağ" → "ağ")
//! 2. Remove punctuation (`: - * ? ' ( ) [ ] / , . ;`)
//! 3. Lowercase (Turkish-aware for `I`/`İ`)
//! 4. Fold phonetic letters to their base letter and drop spaces
//!
//! Standard Turkish letters (ç ğ ı ö ş ü) are kept as they are.
//! The output never starts with an ASCII digit and never contains punctuation,
//! spaces or uppercase letters, so `normalize` is idempotent.

/// Characters removed outright
pub const PUNCTUATION: [char; 13] = [':', '-', '*', '?', '\'', '(', ')', '[', ']', '/', ',', '.', ';'];

/// Lowercase letter → replacement. Applied after lowercasing, so capital
/// forms (Ñ, Ḏ, Ā, ...) are covered too.
const FOLD_TABLE: [(char, &str); 10] = [
    ('ñ', "n"),
    ('ŋ', "n"),
    ('ḏ', "d"),
    ('ḍ', "d"),
    ('é', "e"),
    ('ā', "a"),
    ('ī', "i"),
    ('ū', "u"),
    (' ', ""),
    ('\u{a0}', ""),
];

/// Normalize a headword into its canonical sort/search key
///
/// Empty input yields an empty key.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = strip_numeral_prefixes(text);

    let without_punctuation: String = stripped
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();

    // Removing punctuation can expose a new prefix, e.g. "(2) ağ"
    let unprefixed = strip_numeral_prefixes(&without_punctuation);

    let mut key = String::with_capacity(unprefixed.len());
    for c in unprefixed.chars() {
        for lower in turkish_lowercase(c) {
            match FOLD_TABLE.iter().find(|(from, _)| *from == lower) {
                Some((_, to)) => key.push_str(to),
                None => key.push(lower),
            }
        }
    }

    key
}

/// Strip a leading run of ASCII digits and the whitespace after it
///
/// Leading whitespace before the digits is ignored. Digits elsewhere are kept.
/// Strings that do not start with a numeral are returned unchanged. Only
/// ASCII `0-9` count as a numeral; other scripts' digits are kept.
pub fn strip_numeral_prefix(text: &str) -> &str {
    let trimmed = text.trim_start();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == trimmed.len() {
        text
    } else {
        rest.trim_start()
    }
}

/// Strip numeral prefixes until none is left ("1 2 3 x" → "x")
fn strip_numeral_prefixes(text: &str) -> &str {
    let mut rest = text;
    loop {
        let next = strip_numeral_prefix(rest);
        if next.len() == rest.len() {
            return rest;
        }
        rest = next;
    }
}

/// Lowercase one character, mapping `I` → `ı` and `İ` → `i`
fn turkish_lowercase(c: char) -> impl Iterator<Item = char> {
    let special = match c {
        'I' => Some('ı'),
        'İ' => Some('i'),
        _ => None,
    };
    let generic = if special.is_none() { Some(c.to_lowercase()) } else { None };
    special.into_iter().chain(generic.into_iter().flatten())
}
