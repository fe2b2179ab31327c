use chrono::{DateTime, Utc};
use derive_more::TryInto;
use indexmap::IndexMap;
use regex::Regex;

/// A configuration value as seen by the splicing engine.
///
/// The variant is decided once, when the table is built; serialization
/// dispatches on it without further inspection. Boxed primitives behave like
/// their bare counterparts except for boxed NaN, which always renders `null`.
#[derive(Clone, Debug, PartialEq, TryInto)]
#[try_into(owned, ref)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BoxedNumber(f64),
    String(String),
    BoxedString(String),
    /// `None` is an invalid instant, which renders `null`.
    #[try_into(ignore)]
    Date(Option<DateTime<Utc>>),
    /// Regular-expression source text, spliced verbatim at top level.
    #[try_into(ignore)]
    Pattern(String),
    #[try_into(ignore)]
    Array(Vec<Value>),
    #[try_into(ignore)]
    Object(IndexMap<String, Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Value::Date(Some(instant))
    }
}

impl From<&Regex> for Value {
    fn from(pattern: &Regex) -> Self {
        Value::Pattern(pattern.as_str().to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

impl Value {
    pub fn boxed_number(v: f64) -> Self {
        Value::BoxedNumber(v)
    }

    pub fn boxed_string<S: Into<String>>(s: S) -> Self {
        Value::BoxedString(s.into())
    }

    pub fn pattern<S: Into<String>>(source: S) -> Self {
        Value::Pattern(source.into())
    }

    pub fn invalid_date() -> Self {
        Value::Date(None)
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Own-key lookup; `None` for anything that is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.get(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conversions() {
        assert_eq!(Value::from("V"), Value::String("V".to_owned()));
        assert_eq!(Value::from(2), Value::Number(2.0));
        assert_eq!(Value::from(true), Value::Bool(true));

        let v: f64 = Value::Number(0.5).try_into().unwrap();
        assert_eq!(v, 0.5);
        let s: String = Value::from("str").try_into().unwrap();
        assert_eq!(s, "str");
    }

    #[test]
    fn object_preserves_insertion_order() {
        let v = Value::object([("z", Value::from(1)), ("a", Value::from(2))]);
        let Value::Object(entries) = &v else {
            panic!("not an object");
        };
        let keys: Vec<_> = entries.keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn pattern_from_regex_keeps_source() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(Value::from(&re), Value::Pattern(r"\d+".to_owned()));
    }
}
