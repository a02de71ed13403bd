//! Field naming: data paths, element identifiers and display labels.
//!
//! A path is the wire name of a field (`contact.address[0].street`). The
//! identifier is derived from it for `id`/`for` attributes, and the label is
//! derived from the raw property name for display only.

use serde::Deserialize;

// ── Paths ─────────────────────────────────────────────────────────────────

/// Path of `name` below `parent`. Root fields (no parent) keep their bare name.
pub fn param(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{p}.{name}"),
        _ => name.to_string(),
    }
}

/// Path of the list item at `index` inside the list bound to `name`.
pub fn array_item(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

// ── Identifiers ───────────────────────────────────────────────────────────

/// How paths are turned into element identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Escape then strip non-word characters. Compact and compatible with
    /// existing stylesheets, but `a.b` and `ab` map to the same identifier.
    #[default]
    Stripped,
    /// The stripped form followed by a digest of the full path.
    Hashed,
}

/// Identifier for `path` under the given scheme.
pub fn identifier(scheme: IdScheme, path: &str) -> String {
    match scheme {
        IdScheme::Stripped => to_identifier(path),
        IdScheme::Hashed => format!("{}_{:08x}", to_identifier(path), fnv1a(path)),
    }
}

/// Percent-escapes `path` like the legacy `escape()` function, then removes
/// every non-word character.
///
/// `contact.address[0]` → `contactaddress5B05D`
pub fn to_identifier(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for unit in path.encode_utf16() {
        match unit {
            u if u < 0x80 && is_word(u as u8) => out.push(u as u8 as char),
            // escape() leaves these as-is, so the strip step drops them entirely.
            u if u < 0x80 && b"@*+-./".contains(&(u as u8)) => {}
            // `%XX`: the `%` is stripped, the hex digits survive.
            u if u < 0x100 => out.push_str(&format!("{u:02X}")),
            // `%uXXXX`
            u => out.push_str(&format!("u{u:04X}")),
        }
    }
    out
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// 32-bit FNV-1a.
fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811c_9dc5, |hash, b| (hash ^ u32::from(b)).wrapping_mul(0x0100_0193))
}

// ── Labels ────────────────────────────────────────────────────────────────

/// Converts a property name into a human-friendly label.
///
/// `firstName` → `First Name`, `zipCode2` → `Zip Code 2`.
pub fn to_label(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut spaced = String::with_capacity(raw.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();

            let starts_word = c.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase());
            let camel_hump = prev.is_ascii_lowercase() && c.is_ascii_uppercase();
            let digit_run = c.is_ascii_digit() && !prev.is_ascii_digit();

            if (starts_word || camel_hump || digit_run) && !prev.is_whitespace() {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    let mut rest = spaced.chars();
    match rest.next() {
        Some(first) => first.to_uppercase().chain(rest).collect(),
        None => String::new(),
    }
}
