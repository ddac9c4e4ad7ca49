//! The per-file parse-and-cache step.
//!
//! Runs every line of a file through the classification chain and writes the
//! results into the store: declarations (with their surrounding text for
//! hover data), references, and the per-line range breakpoints that later
//! classification depends on (switch operands, return signatures, map
//! sections).

use crate::cache::IndexStore;
use crate::matching::context::get_words;
use crate::matching::{self, patterns, WordMatch};
use crate::resource::kinds;
use crate::types::{DeclarationText, ExtraData, IdentifierKey, Location, MatchKindId};

/// Section markers in map files; lines below a marker hold cells of that kind.
const MAP_MARKERS: &[(&str, MatchKindId)] = &[
    ("OBJ", MatchKindId::Obj),
    ("LOC", MatchKindId::Loc),
    ("NPC", MatchKindId::Npc),
];

/// Parse one file and cache everything found in it. Callers clear the file's
/// previous contributions first when reindexing.
pub fn index_file(store: &mut IndexStore, file_key: &str, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let is_rs2 = file_key.ends_with(".rs2");

    if file_key.ends_with(".jm2") {
        for (line_num, line) in lines.iter().enumerate() {
            index_map_line(store, line, line_num as u32, file_key);
        }
        return;
    }

    for (line_num, line) in lines.iter().enumerate() {
        let line_num = line_num as u32;
        if is_rs2 {
            cache_switch_block(store, line, line_num, file_key);
        }

        let matches = matching::match_words(store, line, line_num, file_key);
        for matched in matches.into_iter().flatten() {
            if !matched.kind().cache {
                continue;
            }
            if matched.declaration {
                cache_declaration(store, &matched, &lines, line_num, file_key, is_rs2);
            } else {
                cache_reference(store, &matched, line_num, file_key);
            }
        }
    }
}

fn cache_declaration(
    store: &mut IndexStore,
    matched: &WordMatch,
    lines: &[&str],
    line_num: u32,
    file_key: &str,
    is_rs2: bool,
) {
    // One line of leading context so the info comment above the declaration
    // is in reach.
    let start_index = (line_num as usize).saturating_sub(1);
    let text = DeclarationText {
        lines: &lines[start_index..],
        start: line_num as usize - start_index,
    };
    let location = Location::new(file_key, line_num, matched.start);
    let identifier = store
        .identifiers
        .put(&matched.word, matched.kind, location, text, &matched.extra);

    // Script declarations with returns type the `return(...)` statements of
    // the block that follows.
    let has_returns = identifier
        .and_then(|identifier| identifier.signature.as_ref())
        .is_some_and(|signature| !signature.returns.is_empty());
    if is_rs2
        && has_returns
        && patterns::TRIGGER_LINE.is_match(lines[line_num as usize])
    {
        if let Some(key) = IdentifierKey::resolve(&matched.word, matched.kind) {
            store.return_lines.put(line_num + 1, key, file_key);
        }
    }
}

fn cache_reference(store: &mut IndexStore, matched: &WordMatch, line_num: u32, file_key: &str) {
    // For qualified names straight off the text (`table:column`), the
    // reference position points at the part after the colon.
    let mut col = matched.start;
    if !matched.annotations.modified {
        if let Some(colon) = matched.word.find(':') {
            if colon > 0 {
                col += colon as u32 + 1;
            }
        }
    }
    store.identifiers.put_reference(
        &matched.word,
        matched.kind,
        file_key,
        line_num,
        col,
        matched.annotations.pack_id.clone(),
        &matched.extra,
    );
}

/// `switch_<type>` opens a block whose case values carry that type.
fn cache_switch_block(store: &mut IndexStore, line: &str, line_num: u32, file_key: &str) {
    let Some((_, after)) = line.split_once("switch_") else {
        return;
    };
    let data_type = after.split([' ', '(']).next().unwrap_or("");
    let kind = kinds::data_type_to_kind(data_type);
    if kind != MatchKindId::Unknown {
        store.switch_lines.put(line_num + 1, kind, file_key);
    }
}

/// Map files carry no declarations: marker lines open a section and every
/// named cell below references an entity of the section's kind.
fn index_map_line(store: &mut IndexStore, line: &str, line_num: u32, file_key: &str) {
    let trimmed = line.trim();
    if let Some(kind) = MAP_MARKERS
        .iter()
        .find(|(marker, _)| trimmed == *marker)
        .map(|(_, kind)| *kind)
    {
        store.map_lines.put(line_num + 1, kind, file_key);
        return;
    }
    let Some(kind) = store.map_lines.get(line_num, file_key).copied() else {
        return;
    };
    let text = line.split("//").next().unwrap_or("");
    for word in get_words(text, &patterns::WORD) {
        if patterns::MAP_CELL.is_match(&word.value) || word.value == "null" {
            continue;
        }
        store.identifiers.put_reference(
            &word.value,
            kind,
            file_key,
            line_num,
            word.start,
            None,
            &ExtraData::default(),
        );
    }
}
