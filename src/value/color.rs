//! Reversible translation between `&`-based and `§`-based color codes.

/// The color code marker used inside loaded values.
pub const COLOR_CHAR: char = '§';

/// The color code marker used inside documents and human-entered text.
pub const ALT_COLOR_CHAR: char = '&';

const COLOR_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Translates `&`-based color codes to `§`-based color codes.
pub fn colorize(text: &str) -> String {
    translate(text, ALT_COLOR_CHAR, COLOR_CHAR)
}

/// Translates `§`-based color codes back to `&`-based color codes.
pub fn decolorize(text: &str) -> String {
    translate(text, COLOR_CHAR, ALT_COLOR_CHAR)
}

pub fn colorize_all(texts: &[String]) -> Vec<String> {
    texts.iter().map(|text| colorize(text)).collect()
}

pub fn decolorize_all(texts: &[String]) -> Vec<String> {
    texts.iter().map(|text| decolorize(text)).collect()
}

// Only a marker directly followed by a valid code is translated.
fn translate(text: &str, from: char, to: char) -> String {
    let mut translated = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == from && chars.peek().is_some_and(|next| COLOR_CODES.contains(*next)) {
            translated.push(to);
        } else {
            translated.push(c);
        }
    }
    translated
}
