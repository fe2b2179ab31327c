
use itertools::Itertools;

use crate::remap::Remapper;

/// Remaps a multi-line snippet line by line, the way the surrounding
/// preprocessor feeds retained lines through the engine.
pub(crate) fn remap_lines(r: &Remapper, source: &str) -> String {
    source.lines().map(|line| r.remap(line)).join("\n")
}
