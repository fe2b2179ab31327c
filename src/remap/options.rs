use std::env;
use std::path::Path;
use std::str::FromStr;

use cow_utils::CowUtils;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::remap::errors::{RemapError, RemapResult};
use crate::remap::value::Value;

static VARNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Which quote characters get a backslash when a string is spliced at top
/// level. Never applies to pattern sources or inside serialized containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuoteEscape {
    #[default]
    None,
    Single,
    Double,
    Both,
}

impl QuoteEscape {
    pub(crate) fn escapes_single(self) -> bool {
        matches!(self, QuoteEscape::Single | QuoteEscape::Both)
    }

    pub(crate) fn escapes_double(self) -> bool {
        matches!(self, QuoteEscape::Double | QuoteEscape::Both)
    }
}

impl FromStr for QuoteEscape {
    type Err = RemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(QuoteEscape::None),
            "single" => Ok(QuoteEscape::Single),
            "double" => Ok(QuoteEscape::Double),
            "both" => Ok(QuoteEscape::Both),
            _ => Err(RemapError::InvalidQuoteMode { mode: s.to_owned() }),
        }
    }
}

/// Construction options for [`Remapper`](crate::remap::Remapper).
#[derive(Clone, Debug)]
pub struct Options {
    pub(crate) values: Vec<(String, Value)>,
    pub(crate) prefix: char,
    pub(crate) escape_quotes: QuoteEscape,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            values: Vec::new(),
            prefix: '$',
            escape_quotes: QuoteEscape::None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    pub fn values<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.values
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn escape_quotes(mut self, mode: QuoteEscape) -> Self {
        self.escape_quotes = mode;
        self
    }
}

/// Validated, insertion-ordered variable table. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueTable {
    entries: IndexMap<String, Value>,
}

impl ValueTable {
    pub(crate) fn build(file: &str, values: Vec<(String, Value)>) -> RemapResult<ValueTable> {
        let mut entries = IndexMap::new();
        for (name, value) in values {
            if !VARNAME_REGEX.is_match(&name) {
                return Err(RemapError::InvalidVarName { name }.into());
            }
            entries.insert(name, value);
        }

        // _FILE always reflects the file being processed; _VERSION keeps a
        // user-supplied non-empty string and falls back to the crate version.
        entries.insert("_FILE".to_owned(), Value::String(relative_file(file)));
        let has_version =
            matches!(entries.get("_VERSION"), Some(Value::String(s)) if !s.is_empty());
        if !has_version {
            entries.insert(
                "_VERSION".to_owned(),
                Value::String(env!("CARGO_PKG_VERSION").to_owned()),
            );
        }

        Ok(ValueTable { entries })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn relative_file(file: &str) -> String {
    if file.is_empty() {
        return String::new();
    }
    let relative = env::current_dir()
        .ok()
        .and_then(|cwd| Path::new(file).strip_prefix(&cwd).ok())
        .and_then(Path::to_str)
        .unwrap_or(file);
    relative.cow_replace("\\", "/").into_owned()
}
