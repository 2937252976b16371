// src/content/text.rs

use std::iter::Peekable;
use std::str::Chars;

/// Default excerpt length for list previews.
pub const EXCERPT_LENGTH: usize = 150;

/// Returns the text content of `html` with all markup removed and character
/// entities decoded. `None` or empty input yields an empty string. Input is
/// expected to be sanitizer output, but arbitrary malformed markup is
/// tolerated (an unterminated tag swallows the rest of the input, matching
/// how a forgiving parser would treat it).
pub fn strip_tags(html: Option<&str>) -> String {
    let Some(html) = html else {
        return String::new();
    };

    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => skip_tag(&mut chars),
            '&' => out.push_str(&decode_entity(&mut chars)),
            _ => out.push(c),
        }
    }

    out
}

/// Strips markup and caps the result at `max_chars` characters, appending
/// `"..."` only when truncation actually occurred. The cut is made at a
/// character boundary, not a word boundary.
pub fn truncate_plain(html: Option<&str>, max_chars: usize) -> String {
    let text = strip_tags(html);
    if text.chars().count() <= max_chars {
        return text;
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{}...", prefix.trim_end())
}

/// Consumes characters up to and including the closing `>`, honoring quoted
/// attribute values so `>` inside them does not terminate the tag.
fn skip_tag(chars: &mut Peekable<Chars>) {
    let mut quote: Option<char> = None;
    for c in chars.by_ref() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '>' => return,
                _ => {}
            },
        }
    }
}

/// Decodes the entity whose `&` has already been consumed. Unknown or
/// unterminated entities are passed through literally.
fn decode_entity(chars: &mut Peekable<Chars>) -> String {
    let mut name = String::new();

    while let Some(&c) = chars.peek() {
        if c == ';' {
            chars.next();
            return match resolve_entity(&name) {
                Some(decoded) => decoded.to_string(),
                None => format!("&{};", name),
            };
        }
        if name.len() >= 10 || !(c.is_ascii_alphanumeric() || c == '#') {
            break;
        }
        name.push(c);
        chars.next();
    }

    format!("&{}", name)
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
