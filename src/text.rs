//! Free-text helpers shared by every tag that carries a human-readable name.
//!
//! Downstream playlist consumers evaluate these strings inside single-quoted
//! literals, so every `'` in a title, album or artist name must reach the
//! document as `\'`.

/// Backslash-escape every single quote.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\'', "\\'")
}

/// Join tokens with single spaces, then escape.
pub fn join_escaped(tokens: &[&str]) -> String {
    escape_quotes(&tokens.join(" "))
}

/// True when every `'` in `s` is preceded by a backslash.
pub fn is_quote_safe(s: &str) -> bool {
    let mut prev = None;
    for c in s.chars() {
        if c == '\'' && prev != Some('\\') {
            return false;
        }
        prev = Some(c);
    }
    true
}
