use super::*;

#[test]
fn shallow_nesting_returns_inner_result() {
    fn nest(depth: u32) -> String {
        ensure_sufficient_stack(|| {
            if depth == 0 {
                String::new()
            } else {
                format!("[{}]", nest(depth - 1))
            }
        })
    }

    assert_eq!(nest(3), "[[[]]]");
}

#[test]
fn deep_nesting_does_not_overflow() {
    fn depth_of(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth_of(n - 1) + 1 })
    }

    // Comparable to a generated template with 100k nested `#if` blocks.
    assert_eq!(depth_of(100_000), 100_000);
}

#[test]
fn propagates_errors() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Err("unclosed tag"));
    assert_eq!(result, Err("unclosed tag"));
}
