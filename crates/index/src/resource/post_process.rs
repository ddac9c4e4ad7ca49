//! Post-processors attached to match kinds.
//!
//! Each runs once, right after an identifier has been built from a
//! declaration or reference, and directly amends that identifier.

use crate::types::Identifier;

/// First line of a multi-line string.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Derive absolute coordinates from the packed `level_mx_mz_lx_lz` name.
pub fn coord_value(identifier: &mut Identifier) {
    let parts: Vec<i64> = identifier
        .name
        .split('_')
        .filter_map(|part| part.parse().ok())
        .collect();
    if parts.len() == 5 {
        let x = (parts[1] << 6) + parts[3];
        let z = (parts[2] << 6) + parts[4];
        identifier.value = Some(format!("Absolute coordinates: ({x}, {z})"));
    }
}

/// Pull `inputtype=`/`outputtype=` out of an enum's config block.
pub fn enum_types(identifier: &mut Identifier) {
    let Some(block) = identifier.block.as_deref() else {
        return;
    };
    let mut input_type = None;
    let mut output_type = None;
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("inputtype=") {
            input_type = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("outputtype=") {
            output_type = Some(value.to_string());
        }
    }
    identifier.extra.input_type = input_type;
    identifier.extra.output_type = output_type;
}

/// Pull `type=` out of a param's config block; params default to int.
pub fn param_data_type(identifier: &mut Identifier) {
    let data_type = identifier
        .block
        .as_deref()
        .and_then(|block| {
            block
                .lines()
                .find_map(|line| line.strip_prefix("type="))
                .map(str::to_string)
        })
        .unwrap_or_else(|| "int".to_string());
    identifier.extra.data_type = Some(data_type);
}

/// Known config keys get a short description; the rest stay hidden.
pub fn config_key_info(identifier: &mut Identifier) {
    let info = match identifier.name.as_str() {
        "category" => Some("The category this $TYPE belongs to"),
        "table" => Some("The dbtable this row belongs to"),
        "column" => Some("Declares a column of this dbtable"),
        "param" => Some("Attaches a param value to this $TYPE"),
        "val" => Some("One value entry of this enum"),
        "data" => Some("One data cell of this dbrow"),
        "walkanim" => Some("The walking animation sequences of this $TYPE"),
        "huntmode" => Some("The hunt behaviour used by this npc"),
        "multivar" => Some("The var controlling which variant is shown"),
        _ => None,
    };
    match info {
        Some(info) => identifier.info = Some(info.replace("$TYPE", &identifier.file_type)),
        None => identifier.hide_display = true,
    }
}

/// Hover text for trigger references, e.g. the `proc` in `[proc,foo]`.
pub fn trigger_info(identifier: &mut Identifier) {
    let description = match identifier.name.as_str() {
        "proc" => Some("Declares a callable proc"),
        "label" => Some("Declares a jumpable label"),
        "queue" | "weakqueue" => Some("Declares a queueable script"),
        "timer" | "softtimer" => Some("Declares a timer script"),
        "command" => Some("Declares an engine command"),
        "debugproc" => Some("Declares a debug-only proc"),
        _ => None,
    };
    if let (Some(description), Some(trigger_name)) =
        (description, identifier.extra.trigger_name.as_deref())
    {
        identifier.info = Some(format!("{description}: <b>{trigger_name}</b>"));
    }
}

/// Hover text for `_category` script references.
pub fn category_value(identifier: &mut Identifier) {
    if let (Some(kind), Some(name)) = (
        identifier.extra.category_kind,
        identifier.extra.category_name.as_deref(),
    ) {
        identifier.value = Some(format!(
            "This script applies to all <b>{kind}</b> with `category={name}`"
        ));
    }
}

/// Components cache under `interface:component`; display the short name.
pub fn component_interface(identifier: &mut Identifier) {
    if let Some((interface, component)) = identifier.name.split_once(':') {
        identifier.info = Some(format!("A component of the <b>{interface}</b> interface"));
        identifier.name = component.to_string();
    }
}

/// Rows record their owning table and drop the raw block.
pub fn dbrow_table(identifier: &mut Identifier) {
    let Some(block) = identifier.block.take() else {
        return;
    };
    let table = first_line(&block)
        .split_once('=')
        .map(|(_, table)| table.to_string())
        .unwrap_or_default();
    identifier.info = Some(format!("A row in the <b>{table}</b> table"));
    identifier.extra.table = Some(table);
}

/// Columns cache under `table:column`; extract their declared field types.
pub fn dbcolumn_fields(identifier: &mut Identifier) {
    if let Some((table, column)) = identifier.name.split_once(':') {
        identifier.info = Some(format!("A column of the <b>{table}</b> table"));
        identifier.name = column.to_string();
    }
    let Some(block) = identifier.block.as_deref() else {
        return;
    };
    // The declaration line reads column=NAME,type1,type2,...
    let line = first_line(block);
    let Some(fields) = line.strip_prefix("column=") else {
        return;
    };
    let types: Vec<String> = fields
        .split(',')
        .skip(1)
        .map(|field| field.trim().to_string())
        .collect();
    if !types.is_empty() {
        identifier.block = Some(format!("Field types: {}", types.join(", ")));
        identifier.extra.data_types = Some(types);
    }
}

/// Kinds that refer to a file on disk rather than a declaration.
pub fn file_name_info(identifier: &mut Identifier) {
    identifier.info = Some(format!(
        "Refers to the file <b>{}.{}</b>",
        identifier.name, identifier.file_type
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtraData, MatchKindId};
    use std::collections::BTreeMap;

    fn identifier(name: &str, kind: MatchKindId) -> Identifier {
        Identifier {
            name: name.to_string(),
            kind,
            pack_id: None,
            declaration: None,
            references: BTreeMap::new(),
            file_type: "rs2".to_string(),
            language: "runescript".to_string(),
            info: None,
            signature: None,
            block: None,
            value: None,
            extra: ExtraData::default(),
            hide_display: false,
        }
    }

    #[test]
    fn coord_value_unpacks_absolute_position() {
        let mut iden = identifier("0_50_50_20_20", MatchKindId::Coordinates);
        coord_value(&mut iden);
        assert_eq!(
            iden.value.as_deref(),
            Some("Absolute coordinates: (3220, 3220)")
        );
    }

    #[test]
    fn enum_types_reads_block() {
        let mut iden = identifier("my_enum", MatchKindId::Enum);
        iden.block = Some("inputtype=int\noutputtype=namedobj".to_string());
        enum_types(&mut iden);
        assert_eq!(iden.extra.input_type.as_deref(), Some("int"));
        assert_eq!(iden.extra.output_type.as_deref(), Some("namedobj"));
    }

    #[test]
    fn dbcolumn_fields_extracts_types_and_short_name() {
        let mut iden = identifier("quests:stage", MatchKindId::DbColumn);
        iden.block = Some("column=stage,int,string".to_string());
        dbcolumn_fields(&mut iden);
        assert_eq!(iden.name, "stage");
        assert_eq!(
            iden.extra.data_types,
            Some(vec!["int".to_string(), "string".to_string()])
        );
    }

    #[test]
    fn param_data_type_defaults_to_int() {
        let mut iden = identifier("attack_bonus", MatchKindId::Param);
        iden.block = Some("desc=whatever".to_string());
        param_data_type(&mut iden);
        assert_eq!(iden.extra.data_type.as_deref(), Some("int"));
    }
}
