//! Trim marker helpers.
//!
//! A discarding marker removes the horizontal whitespace (spaces and tabs)
//! adjacent to the tag on its side, then at most one line break (`\r\n`,
//! `\n` or `\r`). Nothing further away is touched.

#[inline]
fn is_horizontal(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Drop trailing horizontal whitespace and then one trailing line break.
pub fn trim_line_end(text: &str) -> &str {
    let text = text.trim_end_matches(is_horizontal);
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

/// Drop leading horizontal whitespace and then one leading line break.
pub fn trim_line_start(text: &str) -> &str {
    let text = text.trim_start_matches(is_horizontal);
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .or_else(|| text.strip_prefix('\r'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests;
