pub mod active_file;
pub mod identifier_cache;
pub mod line_range;

use crate::types::{FileKey, IdentifierKey, MatchKindId};
use identifier_cache::IdentifierCache;
use line_range::LineRangeCache;

/// All workspace-wide index state, owned in one place and passed by
/// reference to everything that reads or writes it.
#[derive(Debug, Default)]
pub struct IndexStore {
    pub identifiers: IdentifierCache,
    /// Switch operand kind active per line, for case-value classification.
    pub switch_lines: LineRangeCache<MatchKindId>,
    /// Enclosing script's return-signature key per line.
    pub return_lines: LineRangeCache<IdentifierKey>,
    /// Map-file cell kind active per line (jm2 marker sections).
    pub map_lines: LineRangeCache<MatchKindId>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.identifiers.clear();
        self.switch_lines.clear();
        self.return_lines.clear();
        self.map_lines.clear();
    }

    pub fn clear_file(&mut self, file: &FileKey) {
        self.identifiers.clear_file(file);
        self.switch_lines.clear_file(file);
        self.return_lines.clear_file(file);
        self.map_lines.clear_file(file);
    }
}
