//! Per-block local variable table for the active script file.
//!
//! Only rs2 files carry script blocks; rebuilding against any other dialect
//! just empties the cache. The block list is discarded and regenerated as a
//! whole on every rebuild.

use crate::matching::context::{get_words, split_file_key};
use crate::matching::patterns;
use crate::resource::kinds;
use crate::types::{FileKey, Location, MatchKindId};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct VariableData {
    pub data_type: String,
    pub kind: MatchKindId,
    pub parameter: bool,
    pub declaration: Location,
    pub references: Vec<Location>,
}

/// One trigger-delimited unit of script code with its own variable scope.
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    pub name: String,
    pub trigger: String,
    pub start: u32,
    pub returns: Vec<MatchKindId>,
    /// Keyed by the variable name including its `$` sigil.
    pub variables: FxHashMap<String, VariableData>,
}

#[derive(Debug, Default)]
pub struct ActiveFileCache {
    file: Option<FileKey>,
    blocks: Vec<ScriptBlock>,
}

impl ActiveFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Floor lookup over block start lines.
    pub fn script_at_line(&self, line: u32) -> Option<&ScriptBlock> {
        let mut found = None;
        for block in &self.blocks {
            if line >= block.start {
                found = Some(block);
            }
        }
        found
    }

    pub fn clear(&mut self) {
        self.file = None;
        self.blocks.clear();
    }

    /// Reparse the whole file. Non-script dialects leave the cache empty.
    pub fn rebuild(&mut self, file_key: &str, text: &str) {
        self.clear();
        let (_, file_type) = split_file_key(file_key);
        if file_type != "rs2" {
            return;
        }
        self.file = Some(file_key.to_string());

        let mut parser = BlockParser {
            file_key,
            blocks: Vec::new(),
            current: None,
        };
        for (line_num, raw_line) in text.lines().enumerate() {
            let line_num = line_num as u32;
            let mut line = raw_line;
            let mut index_offset = 0u32;
            if patterns::TRIGGER_LINE.is_match(line) {
                if let Some(definition) = patterns::TRIGGER_DEFINITION.find(line) {
                    // Definitions may share the physical line with code; the
                    // code portion's word offsets are shifted by the header
                    // length.
                    index_offset = definition.end() as u32;
                    parser.parse_trigger_line(&line[..definition.end()], line_num);
                    line = &line[definition.end()..];
                }
            }
            parser.parse_line(line, line_num, index_offset);
        }
        if let Some(block) = parser.current.take() {
            parser.blocks.push(block);
        }
        self.blocks = parser.blocks;
    }
}

struct BlockParser<'a> {
    file_key: &'a str,
    blocks: Vec<ScriptBlock>,
    current: Option<ScriptBlock>,
}

impl BlockParser<'_> {
    fn parse_trigger_line(&mut self, line: &str, line_num: u32) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
        let mut block = ScriptBlock {
            name: String::new(),
            trigger: String::new(),
            start: line_num,
            returns: Vec::new(),
            variables: FxHashMap::default(),
        };
        if let Some(closing) = line.find(']') {
            let mut name_and_trigger = line[1..closing].split(',');
            block.trigger = name_and_trigger.next().unwrap_or("").to_string();
            block.name = name_and_trigger.next().unwrap_or("").to_string();
        }
        self.current = Some(block);

        let (params, rest) = group(line);
        if let Some(params) = params {
            for param in params.split(',') {
                let mut split = param.trim().split(' ');
                if let (Some(data_type), Some(name)) = (split.next(), split.next()) {
                    let col = line.find(name).unwrap_or(0) as u32;
                    self.add_variable(
                        data_type,
                        name,
                        Location::new(self.file_key, line_num, col),
                        true,
                    );
                }
            }
        }
        let (returns, _) = group(rest);
        if let Some(returns) = returns {
            if let Some(block) = self.current.as_mut() {
                block.returns = returns
                    .split(',')
                    .map(|item| kinds::data_type_to_kind(item.trim()))
                    .collect();
            }
        }
    }

    fn parse_line(&mut self, line: &str, line_num: u32, index_offset: u32) {
        let text = line.split("//").next().unwrap_or("");
        let words = get_words(text, &patterns::LOCAL_VAR_WORD);
        for (i, word) in words.iter().enumerate() {
            if !word.value.starts_with('$') {
                continue;
            }
            let location =
                Location::new(self.file_key, line_num, word.start + index_offset);
            let definition = i
                .checked_sub(1)
                .map(|prev| &words[prev])
                .and_then(|prev| prev.value.strip_prefix("def_"));
            match definition {
                Some(data_type) => self.add_variable(data_type, &word.value, location, false),
                None => self.add_reference(&word.value, location),
            }
        }
    }

    fn add_variable(&mut self, data_type: &str, name: &str, declaration: Location, parameter: bool) {
        let Some(block) = self.current.as_mut() else {
            return;
        };
        block.variables.insert(
            name.to_string(),
            VariableData {
                data_type: data_type.to_string(),
                kind: kinds::data_type_to_kind(data_type),
                parameter,
                declaration: declaration.clone(),
                references: Vec::new(),
            },
        );
        self.add_reference(name, declaration);
    }

    /// References to unknown variables are dropped.
    fn add_reference(&mut self, name: &str, location: Location) {
        if let Some(variable) = self
            .current
            .as_mut()
            .and_then(|block| block.variables.get_mut(name))
        {
            variable.references.push(location);
        }
    }
}

/// First `(...)` group's content (empty groups excluded) and the trailing text.
fn group(line: &str) -> (Option<&str>, &str) {
    let Some(opening) = line.find('(') else {
        return (None, "");
    };
    let Some(closing) = line.find(')') else {
        return (None, "");
    };
    if opening + 1 >= closing {
        return (None, &line[closing + 1..]);
    }
    (Some(&line[opening + 1..closing]), &line[closing + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_yields_block_with_params_and_returns() {
        let mut cache = ActiveFileCache::new();
        cache.rebuild("scripts/math.rs2", "[proc,foo](int $x)(int)\n");

        let block = cache.script_at_line(0).unwrap();
        assert_eq!(block.name, "foo");
        assert_eq!(block.trigger, "proc");
        assert_eq!(block.returns, vec![MatchKindId::Number]);
        let variable = block.variables.get("$x").unwrap();
        assert_eq!(variable.data_type, "int");
        assert!(variable.parameter);
        assert_eq!(variable.declaration.line, 0);
    }

    #[test]
    fn def_declarations_and_references_accumulate() {
        let text = "[proc,foo]\ndef_int $total = 0;\n$total = calc($total + 1);\n";
        let mut cache = ActiveFileCache::new();
        cache.rebuild("a.rs2", text);

        let block = cache.script_at_line(2).unwrap();
        let variable = block.variables.get("$total").unwrap();
        assert_eq!(variable.data_type, "int");
        assert!(!variable.parameter);
        // Declaration plus two later uses.
        assert_eq!(variable.references.len(), 3);
    }

    #[test]
    fn blocks_reset_scope_and_floor_lookup_selects_by_line() {
        let text = "[proc,first](int $x)\n$x = 1;\n[proc,second]\n$x = 2;\n";
        let mut cache = ActiveFileCache::new();
        cache.rebuild("a.rs2", text);

        assert_eq!(cache.script_at_line(1).unwrap().name, "first");
        let second = cache.script_at_line(3).unwrap();
        assert_eq!(second.name, "second");
        // $x belongs to the first block only; the reference in the second
        // block is dropped.
        assert!(second.variables.is_empty());
    }

    #[test]
    fn same_line_code_offsets_are_shifted_past_the_header() {
        let text = "[proc,foo](int $x)(int) return(calc($x + 1));\n";
        let mut cache = ActiveFileCache::new();
        cache.rebuild("a.rs2", text);

        let block = cache.script_at_line(0).unwrap();
        let variable = block.variables.get("$x").unwrap();
        // Param declaration, then the use inside the same-line code with its
        // column measured against the full physical line.
        assert_eq!(variable.references.len(), 2);
        let use_col = variable.references[1].col;
        assert_eq!(&text[use_col as usize..use_col as usize + 2], "$x");
    }

    #[test]
    fn non_script_files_leave_the_cache_empty() {
        let mut cache = ActiveFileCache::new();
        cache.rebuild("items.obj", "[bronze_sword]\nname=Bronze sword\n");
        assert!(cache.script_at_line(0).is_none());
    }
}
