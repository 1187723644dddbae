//! Text shaping for emitted documents and registration keys.
//!
//! GraphQL field and variable names are lower-camel-cased from the host
//! member names (`first_name` -> `firstName`, `GetName` -> `getName`).
//! Whitespace handling is byte-stable everywhere: content hashing and
//! deduplication depend on it.


/// Lower-camel-case a host member name.
///
/// Accepts both `snake_case` (idiomatic Rust accessors) and `PascalCase`
/// (generated type members); the first emitted character is always lowered.
pub fn to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if out.is_empty() {
            out.extend(ch.to_lowercase());
            upper_next = false;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Escape a string for a GraphQL string literal (double-quoted).
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Normalize the token-stream rendering of an expression.
///
/// `proc-macro2` prints one space between every token (`vars . user_id`).
/// Collapsing that spacing gives a canonical text that is stable across
/// reformatted but token-identical call sites, which is what registration
/// keys and diagnostic snippets are built from.
pub fn normalize_source(text: &str) -> String {
    let mut out = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for (from, to) in [
        (" :: ", "::"),
        (" . ", "."),
        (" (", "("),
        ("( ", "("),
        (" )", ")"),
        (" ,", ","),
        (" ;", ";"),
        ("| ", "|"),
        (" |", "|"),
        ("! ", "!"),
        ("# ", "#"),
        ("& ", "&"),
    ] {
        out = out.replace(from, to);
    }
    out
}
