use super::*;
use pretty_assertions::assert_eq;
use stencil_value::{DefaultResolver, ErrorKind};

/// Chain of `root -> order -> line`, with a variable in the root frame.
fn chain() -> ScopeChain {
    let mut chain = ScopeChain::new();
    chain.push(Value::map_from([("shop", Value::string("Corner"))]));
    chain.declare("currency", Value::string("EUR"));
    chain.declare("rate", Value::map_from([("pct", Value::I64(20))]));
    chain.push(Value::map_from([("id", Value::I64(7))]));
    chain.push(Value::map_from([
        ("item", Value::string("tea")),
        ("qty", Value::I64(2)),
    ]));
    chain
}

fn resolve_in(chain: &ScopeChain, mode: MemberMode, expr: &str) -> MergeResult<Value> {
    let mut functions = FunctionRegistry::new();
    let _ = functions.register("Twice", |n: i64| n * 2);
    BindContext::new(chain, &functions, &DefaultResolver, mode)?.resolve(expr)
}

fn resolve(expr: &str) -> MergeResult<Value> {
    resolve_in(&chain(), MemberMode::Strict, expr)
}

fn kind(expr: &str) -> Option<ErrorKind> {
    resolve(expr).err().map(|e| e.kind().clone())
}

#[test]
fn self_reference() {
    let chain = chain();
    assert_eq!(resolve("$").ok(), chain.peek(0).ok().cloned());
}

#[test]
fn member_paths() {
    assert_eq!(resolve("$.item").ok(), Some(Value::string("tea")));
    assert_eq!(resolve("item").ok(), Some(Value::string("tea")));
    assert_eq!(resolve("item.len").ok(), Some(Value::U64(3)));
}

#[test]
fn relative_walks() {
    assert_eq!(resolve("..\\id").ok(), Some(Value::I64(7)));
    assert_eq!(resolve("..\\..\\shop").ok(), Some(Value::string("Corner")));
    assert_eq!(resolve("../../$.shop").ok(), Some(Value::string("Corner")));
    assert_eq!(
        resolve("..\\").ok(),
        Some(Value::map_from([("id", Value::I64(7))]))
    );
}

#[test]
fn walk_past_root_overreaches() {
    assert_eq!(
        kind("..\\..\\..\\shop"),
        Some(ErrorKind::ScopeChainOverreach {
            requested: 3,
            depth: 3
        })
    );
}

#[test]
fn variables_fall_through_frames() {
    assert_eq!(resolve(":currency").ok(), Some(Value::string("EUR")));
    assert_eq!(resolve(":rate.pct").ok(), Some(Value::I64(20)));
    assert_eq!(resolve("..\\:currency").ok(), Some(Value::string("EUR")));
}

#[test]
fn undeclared_variable() {
    assert_eq!(
        kind(":missing"),
        Some(ErrorKind::UndeclaredVariableAccess {
            name: "missing".to_string()
        })
    );
}

#[test]
fn function_calls_see_the_frame() {
    assert_eq!(resolve("(qty)=>Twice").ok(), Some(Value::I64(4)));
    assert_eq!(resolve("(..\\id)=>Twice").ok(), Some(Value::I64(14)));
}

#[test]
fn literals() {
    assert_eq!(resolve("'x y'").ok(), Some(Value::string("x y")));
    assert_eq!(resolve("false").ok(), Some(Value::Bool(false)));
    assert_eq!(resolve("null").ok(), Some(Value::Null));
    assert_eq!(resolve("-4").ok(), Some(Value::I64(-4)));
}

#[test]
fn strict_and_lenient_members() {
    assert!(matches!(
        kind("price"),
        Some(ErrorKind::NoSuchMember { .. })
    ));
    assert_eq!(
        resolve_in(&chain(), MemberMode::Lenient, "price").ok(),
        Some(Value::Null)
    );
}

#[test]
fn empty_chain_has_no_context() {
    let functions = FunctionRegistry::new();
    let empty = ScopeChain::new();
    assert!(BindContext::new(&empty, &functions, &DefaultResolver, MemberMode::Strict).is_err());
}

#[test]
fn walk_tokens_are_counted() {
    assert_eq!(split_walk("..\\../x"), Some((2, "x")));
    assert_eq!(split_walk("x"), None);
    assert_eq!(split_walk("..x"), None);
}
