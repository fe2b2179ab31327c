//! Variable reference splicing over retained source lines.
//!
//! A [`Remapper`] is built once per source file from an [`Options`] set. Each
//! retained line is then scanned for `$name.path` references, every resolved
//! reference is serialized, and the text is spliced back in place. Directive
//! parsing, expression evaluation and line retention belong to earlier
//! stages; this one only rewrites the lines it is handed.

pub mod errors;
pub mod options;
pub mod reference_parse;
mod render;
mod resolve;
pub mod value;

#[cfg(test)]
mod tests;

use std::borrow::Cow;

use regex::Regex;

pub use crate::remap::errors::{RemapError, RemapResult};
pub use crate::remap::options::{Options, QuoteEscape, ValueTable};
pub use crate::remap::reference_parse::{Reference, References};
pub use crate::remap::value::Value;

use crate::remap::reference_parse::scan_pattern;
use crate::remap::render::render;

/// The splicing engine: an immutable value table plus the scan pattern
/// compiled for the configured prefix. Every operation takes `&self`, so one
/// engine serves any number of lines or threads without coordination.
#[derive(Clone, Debug)]
pub struct Remapper {
    table: ValueTable,
    escape_quotes: QuoteEscape,
    pattern: Regex,
}

impl Remapper {
    /// Builds the engine for one source file. All validation happens here;
    /// the per-line operations never fail.
    pub fn new<F: AsRef<str>>(file: F, options: Options) -> RemapResult<Remapper> {
        let Options {
            values,
            prefix,
            escape_quotes,
        } = options;
        let table = ValueTable::build(file.as_ref(), values)?;
        let pattern = scan_pattern(prefix)?;
        Ok(Remapper {
            table,
            escape_quotes,
            pattern,
        })
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Scanner over one line, yielding resolved reference spans in order.
    /// Collaborating stages use the span offsets for their own bookkeeping.
    pub fn references<'d, 'l>(&'d self, line: &'l str) -> References<'d, 'l> {
        References::new(&self.table, &self.pattern, line)
    }

    /// Serializes one resolved span exactly as [`Remapper::remap`] would
    /// splice it.
    pub fn render_reference(&self, reference: &Reference<'_, '_>) -> String {
        render(reference.value, self.escape_quotes, reference.descended())
    }

    /// Replaces every resolved reference in `line`, leaving unconsumed path
    /// segments and everything between spans untouched. Lines without any
    /// match are returned borrowed, byte for byte.
    pub fn remap<'l>(&self, line: &'l str) -> Cow<'l, str> {
        let mut out = String::new();
        let mut last = 0;
        let mut matched = false;
        for reference in self.references(line) {
            matched = true;
            out.push_str(&line[last..reference.start]);
            out.push_str(&self.render_reference(&reference));
            last = reference.splice_end;
        }
        if !matched {
            return Cow::Borrowed(line);
        }
        out.push_str(&line[last..]);
        Cow::Owned(out)
    }
}
