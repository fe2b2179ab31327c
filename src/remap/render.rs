use std::borrow::Cow;

use chrono::SecondsFormat;
use cow_utils::CowUtils;
use itertools::Itertools;

use crate::remap::options::QuoteEscape;
use crate::remap::value::Value;

/// Renders a resolved value for splicing. `descended` is set when the value
/// was reached by consuming at least one path segment; the only rendering it
/// changes is bare NaN, which splices as `null` instead of `NaN`.
pub(crate) fn render(value: &Value, quotes: QuoteEscape, descended: bool) -> String {
    match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_nan() => {
            let token = if descended { "null" } else { "NaN" };
            token.to_owned()
        }
        Value::BoxedNumber(n) if n.is_nan() => "null".to_owned(),
        Value::Number(n) | Value::BoxedNumber(n) => {
            if *n == f64::INFINITY {
                "Infinity".to_owned()
            } else if *n == f64::NEG_INFINITY {
                "-Infinity".to_owned()
            } else {
                format_number(*n)
            }
        }
        Value::String(s) | Value::BoxedString(s) => escape_quotes(s, quotes).into_owned(),
        Value::Date(Some(instant)) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        Value::Date(None) => "null".to_owned(),
        Value::Pattern(source) => source.clone(),
        Value::Array(_) | Value::Object(_) => render_nested(value),
    }
}

/// JSON-compatible rendering used inside containers: compact separators,
/// insertion order, double-quoted strings. Quote escaping never applies here.
fn render_nested(value: &Value) -> String {
    match value {
        Value::Undefined | Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) | Value::BoxedNumber(n) => nested_number(*n),
        Value::String(s) | Value::BoxedString(s) | Value::Pattern(s) => json_string(s),
        Value::Date(Some(instant)) => {
            json_string(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Value::Date(None) => "null".to_owned(),
        Value::Array(items) => format!("[{}]", items.iter().map(render_nested).join(",")),
        Value::Object(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(key, item)| format!("{}:{}", json_string(key), render_nested(item)))
                .join(",")
        ),
    }
}

// JSON has no non-finite numbers; the extreme finite doubles stand in for the
// infinities and NaN collapses to null.
fn nested_number(n: f64) -> String {
    if n.is_nan() {
        "null".to_owned()
    } else if n == f64::INFINITY {
        format_number(f64::MAX)
    } else if n == f64::NEG_INFINITY {
        // smallest positive double, 5e-324
        format_number(f64::from_bits(1))
    } else {
        format_number(n)
    }
}

fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn escape_quotes(s: &str, mode: QuoteEscape) -> Cow<'_, str> {
    match (mode.escapes_single(), mode.escapes_double()) {
        (false, false) => Cow::Borrowed(s),
        (true, false) => s.cow_replace("'", "\\'"),
        (false, true) => s.cow_replace("\"", "\\\""),
        (true, true) => match s.cow_replace("'", "\\'") {
            Cow::Borrowed(pass) => pass.cow_replace("\"", "\\\""),
            Cow::Owned(escaped) => Cow::Owned(escaped.replace('"', "\\\"")),
        },
    }
}

/// ECMAScript `Number::toString` in base 10, built over the shortest
/// round-trip digits of `{:e}`: positional notation while the decimal
/// exponent stays in `(-6, 21]`, exponent notation with an explicit sign
/// outside of it.
fn format_number(n: f64) -> String {
    debug_assert!(n.is_finite());
    if n == 0.0 {
        return "0".to_owned();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }

    let sci = format!("{n:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i64;
    let point = exp.parse::<i64>().map(|e| e + 1).unwrap_or(1);

    if k <= point && point <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat('0').take((point - k) as usize));
        out
    } else if 0 < point && point <= 21 {
        let split = point as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat(-point as usize), digits)
    } else {
        let e = point - 1;
        let mantissa = if k == 1 {
            digits
        } else {
            format!("{}.{}", &digits[..1], &digits[1..])
        };
        if e >= 0 {
            format!("{mantissa}e+{e}")
        } else {
            format!("{mantissa}e-{}", -e)
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn numbers_format_like_ecmascript() {
        for (n, expected) in [
            (0.0, "0"),
            (-0.0, "0"),
            (1.0, "1"),
            (2.0, "2"),
            (100.0, "100"),
            (0.5, "0.5"),
            (123.456, "123.456"),
            (-1.5, "-1.5"),
            (1e20, "100000000000000000000"),
            (1e21, "1e+21"),
            (1.5e21, "1.5e+21"),
            (1e-6, "0.000001"),
            (0.0000025, "0.0000025"),
            (1e-7, "1e-7"),
            (2.5e-7, "2.5e-7"),
            (f64::MAX, "1.7976931348623157e+308"),
            (f64::from_bits(1), "5e-324"),
        ] {
            assert_eq!(format_number(n), expected, "for {n:?}");
        }
    }

    #[test]
    fn top_level_strings_are_raw() {
        let v = Value::from("str\"s'");
        assert_eq!(render(&v, QuoteEscape::None, false), "str\"s'");
        assert_eq!(render(&v, QuoteEscape::Single, false), "str\"s\\'");
        assert_eq!(render(&v, QuoteEscape::Double, false), "str\\\"s'");
        assert_eq!(render(&v, QuoteEscape::Both, false), "str\\\"s\\'");
    }

    #[test]
    fn patterns_splice_their_source_unescaped() {
        let v = Value::pattern("^\"'\\d+");
        assert_eq!(render(&v, QuoteEscape::Both, false), "^\"'\\d+");
        assert_eq!(render_nested(&v), r#""^\"'\\d+""#);
    }

    #[test]
    fn nan_renders_by_how_it_was_reached() {
        let bare = Value::Number(f64::NAN);
        assert_eq!(render(&bare, QuoteEscape::None, false), "NaN");
        assert_eq!(render(&bare, QuoteEscape::None, true), "null");
        let boxed = Value::boxed_number(f64::NAN);
        assert_eq!(render(&boxed, QuoteEscape::None, false), "null");
    }

    #[test]
    fn infinities_keep_their_tokens_at_top_level() {
        assert_eq!(
            render(&Value::Number(f64::INFINITY), QuoteEscape::None, true),
            "Infinity"
        );
        assert_eq!(
            render(&Value::Number(f64::NEG_INFINITY), QuoteEscape::None, false),
            "-Infinity"
        );
    }

    #[test]
    fn nested_numbers_substitute_the_non_finite_states() {
        let v = Value::array([
            Value::Number(f64::INFINITY),
            Value::Number(f64::NEG_INFINITY),
            Value::Number(f64::NAN),
        ]);
        assert_eq!(
            render(&v, QuoteEscape::None, false),
            "[1.7976931348623157e+308,5e-324,null]"
        );
    }

    #[test]
    fn dates_render_iso_with_milliseconds() {
        let instant = Utc.with_ymd_and_hms(2018, 10, 17, 0, 0, 0).unwrap();
        let v = Value::from(instant);
        assert_eq!(
            render(&v, QuoteEscape::None, false),
            "2018-10-17T00:00:00.000Z"
        );
        assert_eq!(render_nested(&v), "\"2018-10-17T00:00:00.000Z\"");
        assert_eq!(render(&Value::invalid_date(), QuoteEscape::None, false), "null");
    }

    #[test]
    fn containers_render_compact_in_insertion_order() {
        let v = Value::object([
            ("s", Value::from("a\"b")),
            ("b", Value::Bool(true)),
            ("u", Value::Undefined),
            ("a", Value::array([Value::from(1), Value::from("x")])),
        ]);
        assert_eq!(
            render(&v, QuoteEscape::Both, false),
            r#"{"s":"a\"b","b":true,"u":null,"a":[1,"x"]}"#
        );
    }

    #[test]
    fn control_characters_escape_inside_json_strings() {
        assert_eq!(json_string("a\tb\u{7}"), "\"a\\tb\\u0007\"");
    }
}
