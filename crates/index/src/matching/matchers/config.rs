//! Config-dialect rule: `[name]` declarations and `key=value,...` body lines.
//!
//! Most keys carry a static parameter shape (see the config key table); the
//! `param`, `val`, and `data` keys resolve their shape through another cached
//! identifier, so they are handled by hand here.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::matching::patterns;
use crate::resource::{config_keys, kinds};
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    if patterns::CONFIG_DECLARATION.is_match(&ctx.line.text) {
        return declaration_kind(&ctx.line.file_type).map(RuleMatch::declaration);
    }
    config_line_match(ctx, store)
}

fn declaration_kind(file_type: &str) -> Option<MatchKindId> {
    let kind = match file_type {
        "varp" | "varbit" | "varn" | "vars" => MatchKindId::GlobalVar,
        "obj" => MatchKindId::Obj,
        "loc" => MatchKindId::Loc,
        "npc" => MatchKindId::Npc,
        "param" => MatchKindId::Param,
        "seq" => MatchKindId::Seq,
        "struct" => MatchKindId::Struct,
        "dbrow" => MatchKindId::DbRow,
        "dbtable" => MatchKindId::DbTable,
        "enum" => MatchKindId::Enum,
        "hunt" => MatchKindId::Hunt,
        "inv" => MatchKindId::Inv,
        "spotanim" => MatchKindId::Spotanim,
        "idk" => MatchKindId::Idk,
        "mesanim" => MatchKindId::Mesanim,
        "if" => MatchKindId::Component,
        _ => return None,
    };
    Some(kind)
}

fn config_line_match(ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    if !patterns::CONFIG_LINE.is_match(&ctx.line.text) {
        return None;
    }
    let config_key = ctx.line.words[0].value.as_str();
    // The key itself is the word under the cursor.
    if ctx.word.index == 0 {
        return Some(RuleMatch::reference(MatchKindId::ConfigKey));
    }
    if config_keys::SPECIAL_CASE_KEYS.contains(&config_key) {
        return special_case(config_key, ctx, store);
    }

    let params = config_keys::static_key(config_key)
        .or_else(|| config_keys::regex_key(config_key, &ctx.line.file_type))?;
    let index = param_index(&ctx.line.text, ctx.cursor)?;
    let param = params.get(index)?;
    let kind = kinds::data_type_to_kind(param.data_type);
    Some(if param.declaration {
        RuleMatch::declaration(kind)
    } else {
        RuleMatch::reference(kind)
    })
}

fn special_case(key: &str, ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    match key {
        "param" => Some(param_case(ctx, store)),
        "val" => Some(val_case(ctx, store)),
        "data" => Some(data_case(ctx, store)),
        _ => None,
    }
}

/// `param=<param-name>,<value typed by that param's data type>`
fn param_case(ctx: &WordContext<'_>, store: &IndexStore) -> RuleMatch {
    if ctx.word.index == 1 {
        return RuleMatch::reference(MatchKindId::Param);
    }
    if ctx.word.index == 2 {
        let param = store
            .identifiers
            .get(&ctx.line.words[1].value, MatchKindId::Param);
        if let Some(data_type) = param.and_then(|param| param.extra.data_type.as_deref()) {
            return RuleMatch::reference(kinds::data_type_to_kind(data_type));
        }
    }
    RuleMatch::reference(MatchKindId::Unknown)
}

/// `val=<input>,<output>` typed by the enclosing enum's declared types.
fn val_case(ctx: &WordContext<'_>, store: &IndexStore) -> RuleMatch {
    let parent = store
        .identifiers
        .parent_declaration(&ctx.line.file_key, ctx.line.line, None);
    if let Some(parent) = parent {
        let value_types = [
            parent.extra.input_type.as_deref(),
            parent.extra.output_type.as_deref(),
        ];
        if let Some(index) = param_index(&ctx.line.text, ctx.cursor) {
            if let Some(Some(data_type)) = value_types.get(index) {
                return RuleMatch::reference(kinds::data_type_to_kind(data_type));
            }
        }
    }
    RuleMatch::reference(MatchKindId::Unknown)
}

/// `data=<column>,<fields typed by the column's declared field types>`. An
/// unqualified column name resolves through the enclosing dbrow's table.
fn data_case(ctx: &WordContext<'_>, store: &IndexStore) -> RuleMatch {
    if ctx.word.index == 1 {
        return RuleMatch::reference(MatchKindId::DbColumn);
    }
    if ctx.word.index > 1 {
        let mut column_name = ctx.line.words[1].value.clone();
        if !column_name.contains(':') {
            let row = store
                .identifiers
                .parent_declaration(&ctx.line.file_key, ctx.line.line, None);
            if let Some(table) = row.and_then(|row| row.extra.table.as_deref()) {
                column_name = format!("{table}:{column_name}");
            }
        }
        let column = store.identifiers.get(&column_name, MatchKindId::DbColumn);
        if let Some(data_types) = column.and_then(|column| column.extra.data_types.as_ref()) {
            if let Some(index) = param_index(&ctx.line.text, ctx.cursor) {
                // Position 0 is the column name itself.
                let kind = index
                    .checked_sub(1)
                    .and_then(|field| data_types.get(field))
                    .map(|data_type| kinds::data_type_to_kind(data_type))
                    .unwrap_or(MatchKindId::Unknown);
                return RuleMatch::reference(kind);
            }
        }
    }
    RuleMatch::reference(MatchKindId::Unknown)
}

/// Which comma-separated position of the line the cursor sits in.
fn param_index(line: &str, cursor: u32) -> Option<usize> {
    let mut end = 0usize;
    for (i, part) in line.split(',').enumerate() {
        end += part.len() + 1;
        if (cursor as usize) < end {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_index_counts_commas() {
        assert_eq!(param_index("stock1=coins,100,1", 8), Some(0));
        assert_eq!(param_index("stock1=coins,100,1", 14), Some(1));
        assert_eq!(param_index("stock1=coins,100,1", 17), Some(2));
        assert_eq!(param_index("abc", 99), None);
    }
}
