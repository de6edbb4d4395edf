//! Whitespace trimming around tags.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use stencil_eval::{Engine, Value};

fn data() -> Value {
    Value::map_from([
        ("x", Value::string("X")),
        (
            "items",
            Value::list(vec![Value::string("a"), Value::string("b")]),
        ),
    ])
}

fn render(template: &str) -> String {
    Engine::new(template).merge(&data()).unwrap()
}

fn render_trimmed(template: &str) -> String {
    Engine::builder(template)
        .trim_whitespace(true)
        .build()
        .merge(&data())
        .unwrap()
}

mod markers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn left_marker_trims_preceding_line_end() {
        assert_eq!(render("a  \t{-x}  b"), "aX  b");
    }

    #[test]
    fn right_marker_trims_following_line_start() {
        assert_eq!(render("a  {x-}  \tb"), "a  Xb");
    }

    #[test]
    fn only_one_line_break_is_consumed() {
        assert_eq!(render("a\n\n  {-x}"), "a\nX");
        assert_eq!(render("{x-}  \n\nb"), "X\nb");
    }

    #[test]
    fn crlf_counts_as_one_break() {
        assert_eq!(render("a\r\n{-x-}\r\nb"), "aXb");
    }

    #[test]
    fn unmarked_tags_keep_whitespace() {
        assert_eq!(render("a \n{x}\n b"), "a \nX\n b");
    }

    #[test]
    fn comments_can_swallow_their_line() {
        assert_eq!(render("one\n{-! note -}\ntwo"), "onetwo");
    }
}

mod blocks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn untrimmed_list() {
        let template = "<ul>{#each items}\n  <li>{$}</li>{#/each}\n</ul>";
        assert_eq!(render(template), "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    }

    #[test]
    fn markers_face_the_body() {
        let template = "<ul>\n{#each items-}\n  <li>{$}</li>\n{-#/each}\n</ul>";
        assert_eq!(render(template), "<ul>\n  <li>a</li>  <li>b</li>\n</ul>");
    }

    #[test]
    fn close_right_marker_trims_after_block() {
        assert_eq!(render("{#if true}y{#/if-}  \nz"), "yz");
    }

    #[test]
    fn open_left_marker_trims_before_block() {
        assert_eq!(render("w\n  {-#if true}y{#/if}"), "wy");
    }
}

mod global {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn directives_trim_both_sides() {
        assert_eq!(render_trimmed("a\n{#if true}\nb\n{#/if}\nc"), "abc");
    }

    #[test]
    fn simple_tags_are_exempt() {
        assert_eq!(render_trimmed("a\n{x}\nb"), "a\nX\nb");
    }

    #[test]
    fn retain_marker_overrides() {
        assert_eq!(
            render_trimmed("a\n{+#if true+}\nb\n{+#/if+}\nc"),
            "a\n\nb\n\nc"
        );
    }

    #[test]
    fn simple_tags_still_honor_explicit_markers() {
        assert_eq!(render_trimmed("a\n{-x-}\nb"), "aXb");
    }

    #[test]
    fn toggled_on_an_engine() {
        let mut engine = Engine::new("a\n{! c }\nb");
        assert_eq!(engine.merge(&data()).unwrap(), "a\n\nb");
        engine.set_trim_whitespace(true);
        assert_eq!(engine.merge(&data()).unwrap(), "ab");
    }
}

mod rendered_output {
    use super::*;
    use pretty_assertions::assert_eq;

    fn padded() -> Value {
        Value::map_from([
            ("line", Value::string("row\n")),
            ("pad", Value::string("x  ")),
            ("p", Value::string("a  \n")),
            ("inner", Value::string("{-pad}")),
        ])
    }

    fn render_padded(template: &str) -> String {
        Engine::new(template).merge(&padded()).unwrap()
    }

    #[test]
    fn left_marker_keeps_value_whitespace() {
        assert_eq!(render_padded("{line}{-!c}|"), "row\n|");
        assert_eq!(render_padded("{pad}{-!c}|"), "x  |");
    }

    #[test]
    fn left_marker_trims_only_template_text_after_a_value() {
        assert_eq!(render_padded("{pad} \t\n{-!c}|"), "x  |");
        assert_eq!(render_padded("{line}\n\n{-!c}|"), "row\n\n|");
    }

    #[test]
    fn left_marker_keeps_block_output() {
        assert_eq!(render_padded("{#if true}{pad}{#/if}{-!c}|"), "x  |");
        assert_eq!(render_padded("{#with $}{line}{#/with}{-!c}|"), "row\n|");
    }

    #[test]
    fn markers_keep_partial_output() {
        assert_eq!(render_padded("{>p}{-!c}|"), "a  \n|");
        assert_eq!(render_padded("{!c-}  {>p}|"), "a  \n|");
    }

    #[test]
    fn partial_markers_stay_inside_the_partial() {
        assert_eq!(render_padded("keep \n{>inner}"), "keep \nx  ");
    }

    #[test]
    fn global_trim_keeps_value_whitespace() {
        let engine = Engine::builder("{pad}{#if true}y{#/if}")
            .trim_whitespace(true)
            .build();
        assert_eq!(engine.merge(&padded()).unwrap(), "x  y");
    }
}
