use super::*;
use pretty_assertions::assert_eq;

#[test]
fn line_end_takes_spaces_and_one_break() {
    assert_eq!(trim_line_end("a\n\n  \t"), "a\n");
    assert_eq!(trim_line_end("a \r\n"), "a ");
    assert_eq!(trim_line_end("a\r"), "a");
    assert_eq!(trim_line_end("a"), "a");
}

#[test]
fn line_start_takes_spaces_and_one_break() {
    assert_eq!(trim_line_start(" \t\nb\n"), "b\n");
    assert_eq!(trim_line_start("\r\n\r\nb"), "\r\nb");
    assert_eq!(trim_line_start("\n  b"), "  b");
    assert_eq!(trim_line_start(""), "");
}

#[test]
fn other_whitespace_is_kept() {
    assert_eq!(trim_line_start("\u{a0}b"), "\u{a0}b");
    assert_eq!(trim_line_end("b\u{2003}"), "b\u{2003}");
}
