use super::*;

#[test]
fn defaults() {
    let options = MergeOptions::default();
    assert!(!options.trim_whitespace);
    assert_eq!(options.max_depth, 25);
    assert!(options.members.is_strict());
}

#[test]
fn chained_setters() {
    let options = MergeOptions::default().lenient().trimmed();
    assert!(options.trim_whitespace);
    assert_eq!(options.members, MemberMode::Lenient);
}
