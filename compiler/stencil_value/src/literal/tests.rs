use super::*;
use crate::errors::ErrorKind;

fn kind_of(result: MergeResult<Value>) -> Option<ErrorKind> {
    result.err().map(|e| e.kind().clone())
}

mod numbers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unsuffixed_integral_is_i64() {
        assert_eq!(parse_number("42").ok(), Some(Value::I64(42)));
        assert_eq!(parse_number("-3").ok(), Some(Value::I64(-3)));
        assert_eq!(parse_number("+9").ok(), Some(Value::I64(9)));
    }

    #[test]
    fn unsuffixed_fractional_is_f64() {
        assert_eq!(parse_number("2.5").ok(), Some(Value::F64(2.5)));
        assert_eq!(parse_number(".5").ok(), Some(Value::F64(0.5)));
        assert_eq!(parse_number("1e3").ok(), Some(Value::F64(1000.0)));
    }

    #[test]
    fn too_large_for_i64_falls_back_to_u64() {
        assert_eq!(
            parse_number("18446744073709551615").ok(),
            Some(Value::U64(u64::MAX))
        );
    }

    #[test]
    fn suffix_picks_width() {
        assert_eq!(parse_number("7u8").ok(), Some(Value::U8(7)));
        assert_eq!(parse_number("7i16").ok(), Some(Value::I16(7)));
        assert_eq!(parse_number("1.5f32").ok(), Some(Value::F32(1.5)));
        assert_eq!(
            parse_number("1.25m").ok(),
            Some(Value::Decimal(Decimal::new(125, 2)))
        );
    }

    #[test]
    fn suffix_out_of_range_fails() {
        assert_eq!(
            kind_of(parse_number("300u8")),
            Some(ErrorKind::LiteralParseFailure {
                literal: "300u8".to_string(),
                target: "u8".to_string(),
            })
        );
    }

    #[test]
    fn garbage_after_digits_fails() {
        assert!(matches!(
            kind_of(parse_number("12abc")),
            Some(ErrorKind::LiteralParseFailure { .. })
        ));
    }

    #[test]
    fn numeric_start_detection() {
        assert!(is_numeric_start("1"));
        assert!(is_numeric_start("-1"));
        assert!(is_numeric_start("+.5"));
        assert!(is_numeric_start(".5"));
        assert!(!is_numeric_start("-"));
        assert!(!is_numeric_start("."));
        assert!(!is_numeric_start("..\\x"));
        assert!(!is_numeric_start("name"));
        assert!(!is_numeric_start(""));
    }
}

mod typed {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unsuffixed_literal_parses_as_target() {
        assert_eq!(ParamType::I32.coerce_numeric("5").ok(), Some(Value::I32(5)));
        assert_eq!(ParamType::U16.coerce_numeric("5").ok(), Some(Value::U16(5)));
        assert_eq!(ParamType::F32.coerce_numeric("5").ok(), Some(Value::F32(5.0)));
        assert_eq!(
            ParamType::Decimal.coerce_numeric("5.10").ok(),
            Some(Value::Decimal(Decimal::new(510, 2)))
        );
    }

    #[test]
    fn no_implicit_narrowing() {
        assert_eq!(
            kind_of(ParamType::I8.coerce_numeric("200")),
            Some(ErrorKind::LiteralParseFailure {
                literal: "200".to_string(),
                target: "i8".to_string(),
            })
        );
        assert!(ParamType::I64.coerce_numeric("2.5").is_err());
        assert!(ParamType::U32.coerce_numeric("-1").is_err());
    }

    #[test]
    fn suffix_wins_over_target() {
        let value = ParamType::I64.coerce_numeric("5i32").ok();
        assert_eq!(value, Some(Value::I32(5)));
        assert!(!ParamType::I64.accepts(&Value::I32(5)));
    }

    #[test]
    fn quoted_char_requires_one_char() {
        assert_eq!(ParamType::Char.coerce_quoted("'x'").ok(), Some(Value::Char('x')));
        assert!(ParamType::Char.coerce_quoted("\"xy\"").is_err());
        assert!(ParamType::Char.coerce_quoted("''").is_err());
    }

    #[test]
    fn quoted_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).and_then(|d| d.and_hms_opt(13, 5, 0));
        let expected = expected.map(Value::DateTime);
        assert_eq!(
            ParamType::DateTime.coerce_quoted("\"2024-02-29T13:05:00\"").ok(),
            expected
        );
        assert_eq!(
            ParamType::DateTime.coerce_quoted("\"2024-02-29 13:05:00\"").ok(),
            expected
        );
        let midnight = NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Value::DateTime);
        assert_eq!(
            ParamType::DateTime.coerce_quoted("'2024-02-29'").ok(),
            midnight
        );
        assert!(ParamType::DateTime.coerce_quoted("\"yesterday\"").is_err());
    }

    #[test]
    fn quoted_for_bool_is_a_string_that_fails_accepts() {
        let value = ParamType::Bool.coerce_quoted("\"x\"").ok();
        assert_eq!(value, Some(Value::string("x")));
        assert!(!ParamType::Bool.accepts(&Value::string("x")));
    }

    #[test]
    fn any_accepts_everything() {
        assert!(ParamType::Any.accepts(&Value::Null));
        assert!(ParamType::Any.accepts(&Value::list(vec![])));
        assert!(!ParamType::String.accepts(&Value::Null));
    }
}

mod text {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unquote_resolves_escapes() {
        assert_eq!(unquote(r#""a\"b""#).as_deref(), Some("a\"b"));
        assert_eq!(unquote(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(unquote(r#""tab\there""#).as_deref(), Some("tab\there"));
        assert_eq!(unquote("\"{x}, (y)\"").as_deref(), Some("{x}, (y)"));
    }

    #[test]
    fn unquote_rejects_unquoted() {
        assert_eq!(unquote("plain"), None);
        assert_eq!(unquote("\"open"), None);
        assert_eq!(unquote("\"mixed'"), None);
        assert_eq!(unquote("\""), None);
    }

    #[test]
    fn bool_is_case_insensitive() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn literal_dispatch() {
        assert_eq!(parse_literal("'hi'").and_then(Result::ok), Some(Value::string("hi")));
        assert_eq!(parse_literal("true").and_then(Result::ok), Some(Value::Bool(true)));
        assert_eq!(parse_literal("null").and_then(Result::ok), Some(Value::Null));
        assert_eq!(parse_literal("3").and_then(Result::ok), Some(Value::I64(3)));
        assert!(parse_literal("$.name").is_none());
        assert!(parse_literal("items").is_none());
    }
}
