//! Diacritic composition
//!
//! Madouji marks long vowels with an apostrophe after the letter
//! (`a'`); the glyph set has a single accented glyph for each.

/// Marker that follows a base letter
pub const DIACRITIC_MARKER: char = '\'';

/// Accented glyph for a base letter, case-insensitive
///
/// Uppercase bases deliberately map to the lowercase glyph; the glyph set
/// has no uppercase accented forms.
fn accented(base: char) -> Option<char> {
    match base.to_ascii_lowercase() {
        'a' => Some('á'),
        'e' => Some('é'),
        'i' => Some('í'),
        'o' => Some('ó'),
        'u' => Some('ú'),
        'y' => Some('ý'),
        'w' => Some('\u{b5}'),
        _ => None,
    }
}

/// Replace every `<base>'` pair with its accented glyph
pub fn compose_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match accented(c) {
            Some(glyph) if chars.peek() == Some(&DIACRITIC_MARKER) => {
                chars.next();
                out.push(glyph);
            }
            _ => out.push(c),
        }
    }

    out
}
