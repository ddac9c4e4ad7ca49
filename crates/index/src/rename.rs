//! Rename planning.
//!
//! Computes the full edit set for renaming a symbol; applying the edits is
//! the editor layer's job. Planning fails fast before any edit is computed,
//! so a refused rename never produces partial output.
//!
//! Local variables rename through the active-file block's reference list;
//! everything else renames by decoding the identifier's cached reference
//! positions. A matched word that was rewritten during classification
//! (stripped `cert_`/`_` prefix, stripped model suffix, `:`-qualified name)
//! renames only the stored part, so the stripped text survives on disk.

use crate::cache::active_file::ActiveFileCache;
use crate::cache::IndexStore;
use crate::matching::{self, WordMatch};
use crate::types::{FileKey, MatchKindId, TextEdit};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    #[error("nothing to rename here")]
    NoMatch,
    #[error("{0} renaming not supported")]
    NotSupported(MatchKindId),
    #[error("no references found for `{0}`")]
    NoIdentifier(String),
}

/// Fail-fast validation. Returns the matched word, whose text doubles as the
/// rename placeholder.
pub fn prepare(
    store: &IndexStore,
    line_text: &str,
    line: u32,
    file_key: &str,
    cursor: u32,
) -> Result<WordMatch, RenameError> {
    let matched = matching::match_word_at(store, line_text, line, file_key, cursor)
        .ok_or(RenameError::NoMatch)?;
    let kind = matched.kind();
    if !kind.allow_rename || kind.noop {
        return Err(RenameError::NotSupported(matched.kind));
    }
    if matched.kind != MatchKindId::LocalVar
        && store.identifiers.get(&matched.word, matched.kind).is_none()
    {
        return Err(RenameError::NoIdentifier(matched.word.clone()));
    }
    Ok(matched)
}

/// Compute every text edit for the rename.
pub fn plan(
    store: &IndexStore,
    active: &ActiveFileCache,
    matched: &WordMatch,
    line: u32,
    new_name: &str,
) -> Result<Vec<TextEdit>, RenameError> {
    if matched.kind == MatchKindId::LocalVar {
        return Ok(local_var_edits(active, matched, line, new_name));
    }
    let new_name = adjust_new_name(matched, new_name);
    let identifier = store
        .identifiers
        .get(&matched.word, matched.kind)
        .ok_or_else(|| RenameError::NoIdentifier(matched.word.clone()))?;
    let width = edit_width(&matched.word);

    let mut edits = Vec::new();
    for (file, positions) in &identifier.references {
        for pos in positions {
            edits.push(TextEdit {
                file: file.clone(),
                line: pos.line,
                start_col: pos.col,
                end_col: pos.col + width,
                new_text: new_name.clone(),
            });
        }
    }
    Ok(edits)
}

/// For file-named kinds (models, synths), the files that must be renamed
/// alongside the symbol: `(old path, new file name)` pairs. Loc models keep
/// their one-character shape suffix.
pub fn file_renames(
    matched: &WordMatch,
    new_name: &str,
    files: &[FileKey],
) -> Vec<(FileKey, String)> {
    let kind = matched.kind();
    if !kind.rename_file {
        return Vec::new();
    }
    let Some(ext) = kind.file_types.first() else {
        return Vec::new();
    };
    let old_name = &matched.word;
    let new_name = adjust_new_name(matched, new_name);
    let plain = format!("{old_name}.{ext}");
    let dot_ext = format!(".{ext}");
    let underscored = format!("{old_name}_");

    let mut renames = Vec::new();
    for file in files {
        let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        let shape_suffix = name
            .strip_prefix(&underscored)
            .and_then(|rest| rest.strip_suffix(&dot_ext))
            .filter(|suffix| suffix.len() == 1);
        let matches = name == plain
            || (matched.kind == MatchKindId::Model && shape_suffix.is_some());
        if !matches {
            continue;
        }
        let new_file = match shape_suffix {
            Some(suffix) => format!("{new_name}_{suffix}{dot_ext}"),
            None => format!("{new_name}{dot_ext}"),
        };
        renames.push((file.clone(), new_file));
    }
    renames
}

fn local_var_edits(
    active: &ActiveFileCache,
    matched: &WordMatch,
    line: u32,
    new_name: &str,
) -> Vec<TextEdit> {
    let Some(block) = active.script_at_line(line) else {
        return Vec::new();
    };
    let key = format!("${}", matched.word);
    let Some(variable) = block.variables.get(&key) else {
        return Vec::new();
    };
    variable
        .references
        .iter()
        .map(|location| TextEdit {
            file: location.file.clone(),
            line: location.line,
            start_col: location.col,
            end_col: location.col + key.len() as u32,
            new_text: format!("${new_name}"),
        })
        .collect()
}

/// Normalize the user-supplied replacement against the matched word's
/// annotations: a re-typed stripped prefix or suffix comes off, and only the
/// part after a `:` qualifier is kept.
fn adjust_new_name(matched: &WordMatch, new_name: &str) -> String {
    let mut name = new_name;
    if let Some(prefix) = matched.annotations.original_prefix {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }
    if let Some(suffix) = &matched.annotations.original_suffix {
        name = name.strip_suffix(suffix.as_str()).unwrap_or(name);
    }
    match name.find(':') {
        Some(colon) => name[colon + 1..].to_string(),
        None => name.to_string(),
    }
}

/// Stored reference positions point at the text after any `:` qualifier, so
/// the edit only spans that part.
fn edit_width(word: &str) -> u32 {
    let after_colon = word.find(':').map(|colon| colon + 1).unwrap_or(0);
    (word.len() - after_colon) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing;

    #[test]
    fn cert_prefix_survives_a_rename() {
        let mut store = IndexStore::new();
        indexing::index_file(&mut store, "items.obj", "[coins]\nname=Coins\n");
        indexing::index_file(&mut store, "pack/obj.pack", "10\tcert_coins\n");

        let line = "10\tcert_coins";
        let matched = prepare(&store, line, 0, "pack/obj.pack", 5).unwrap();
        assert_eq!(matched.word, "coins");

        let active = ActiveFileCache::new();
        let edits = plan(&store, &active, &matched, 0, "cert_gold").unwrap();
        // The edit covers only the base name; `cert_` stays on disk.
        let pack_edit = edits
            .iter()
            .find(|edit| edit.file == "pack/obj.pack")
            .unwrap();
        assert_eq!(pack_edit.new_text, "gold");
        assert_eq!(pack_edit.start_col, 8);
        assert_eq!(pack_edit.end_col, 13);
    }

    #[test]
    fn qualified_names_edit_only_the_right_side() {
        let mut store = IndexStore::new();
        indexing::index_file(
            &mut store,
            "engine.rs2",
            "[command,db_getfield](dbcolumn $column, int $row)(int)\n",
        );
        indexing::index_file(&mut store, "db/items.dbtable", "[items]\ncolumn=price,int\n");
        indexing::index_file(&mut store, "a.rs2", "db_getfield(items:price, 0);\n");

        let matched = prepare(&store, "column=price,int", 1, "db/items.dbtable", 8).unwrap();
        assert_eq!(matched.word, "items:price");

        let active = ActiveFileCache::new();
        let edits = plan(&store, &active, &matched, 1, "cost").unwrap();
        let script_edit = edits.iter().find(|edit| edit.file == "a.rs2").unwrap();
        assert_eq!(script_edit.new_text, "cost");
        assert_eq!(script_edit.end_col - script_edit.start_col, 5);
    }

    #[test]
    fn local_variables_rename_through_the_active_block() {
        let store = IndexStore::new();
        let mut active = ActiveFileCache::new();
        active.rebuild("a.rs2", "[proc,foo](int $x)\n$x = calc($x + 1);\n");

        let matched = prepare(&store, "$x = calc($x + 1);", 1, "a.rs2", 1).unwrap();
        assert_eq!(matched.kind, MatchKindId::LocalVar);

        let edits = plan(&store, &active, &matched, 1, "total").unwrap();
        assert_eq!(edits.len(), 3);
        assert!(edits.iter().all(|edit| edit.new_text == "$total"));
    }

    #[test]
    fn unsupported_kinds_fail_before_planning() {
        let store = IndexStore::new();
        let result = prepare(&store, "[proc,foo]", 0, "a.rs2", 2);
        assert_eq!(
            result.unwrap_err(),
            RenameError::NotSupported(MatchKindId::Trigger)
        );
    }

    #[test]
    fn unknown_identifiers_fail_fast() {
        let store = IndexStore::new();
        let result = prepare(&store, "~missing_proc(1);", 0, "a.rs2", 3);
        assert_eq!(
            result.unwrap_err(),
            RenameError::NoIdentifier("missing_proc".to_string())
        );
    }

    #[test]
    fn model_file_renames_keep_shape_suffixes() {
        let mut store = IndexStore::new();
        indexing::index_file(&mut store, "assets/loc.loc", "[tree]\nmodel=oak_2\n");
        let matched = prepare(&store, "model=oak_2", 1, "assets/loc.loc", 7).unwrap();
        assert_eq!(matched.word, "oak");
        assert_eq!(matched.annotations.original_suffix.as_deref(), Some("_2"));

        let files = vec![
            "models/oak.ob2".to_string(),
            "models/oak_2.ob2".to_string(),
            "models/oakland.ob2".to_string(),
        ];
        let renames = file_renames(&matched, "willow", &files);
        assert_eq!(
            renames,
            vec![
                ("models/oak.ob2".to_string(), "willow.ob2".to_string()),
                ("models/oak_2.ob2".to_string(), "willow_2.ob2".to_string()),
            ]
        );
    }
}
