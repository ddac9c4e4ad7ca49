//! Identifier construction.
//!
//! Builds the full identifier record for a declaration (hover info line,
//! parsed signature, code block) or the minimal placeholder for a reference
//! seen before its declaration, then runs the kind's post-processor.

use crate::matching::context::split_file_key;
use crate::matching::patterns;
use crate::resource::kinds::{self, MatchKind};
use crate::types::{
    DeclarationText, ExtraData, Identifier, Location, Signature, SignatureParam,
};
use std::collections::BTreeMap;

/// Build an identifier from its declaration.
pub fn build_declaration(
    name: &str,
    kind: &'static MatchKind,
    declaration: Location,
    text: DeclarationText<'_>,
    extra: &ExtraData,
) -> Identifier {
    let (_, file_type) = split_file_key(&declaration.file);
    let mut identifier = Identifier {
        name: name.to_string(),
        kind: kind.id,
        pack_id: None,
        declaration: Some(declaration),
        references: BTreeMap::new(),
        file_type,
        language: hover_language(kind),
        info: None,
        signature: None,
        block: None,
        value: None,
        extra: ExtraData::default(),
        hide_display: false,
    };
    process(&mut identifier, kind, Some(text), extra);
    identifier
}

/// Build the minimal placeholder for a reference with no known declaration.
pub fn build_reference(name: &str, kind: &'static MatchKind, extra: &ExtraData) -> Identifier {
    let mut identifier = Identifier {
        name: name.to_string(),
        kind: kind.id,
        pack_id: None,
        declaration: None,
        references: BTreeMap::new(),
        file_type: kind.file_types.first().unwrap_or(&"rs2").to_string(),
        language: hover_language(kind),
        info: None,
        signature: None,
        block: None,
        value: None,
        extra: ExtraData::default(),
        hide_display: false,
    };
    if kind.reference_only {
        process(&mut identifier, kind, None, extra);
    } else {
        identifier.extra.merge(extra);
    }
    identifier
}

fn hover_language(kind: &MatchKind) -> String {
    kind.hover
        .map(|hover| hover.language)
        .filter(|language| !language.is_empty())
        .unwrap_or("runescript")
        .to_string()
}

fn process(
    identifier: &mut Identifier,
    kind: &'static MatchKind,
    text: Option<DeclarationText<'_>>,
    extra: &ExtraData,
) {
    identifier.extra.merge(extra);

    if let Some(text) = text {
        process_info_text(identifier, text);
        if let Some(hover) = kind.hover {
            if hover.signature {
                identifier.signature = Some(parse_signature(text));
            }
            if hover.code_block {
                process_code_block(identifier, kind, text);
            }
        }
    }

    if let Some(post_process) = kind.post_process {
        post_process(identifier);
    }
}

/// The line above a declaration may carry its info comment.
fn process_info_text(identifier: &mut Identifier, text: DeclarationText<'_>) {
    if text.start < 1 {
        return;
    }
    let Some(info_line) = text.lines.get(text.start - 1) else {
        return;
    };
    if let Some(captures) = patterns::INFO_LINE.captures(info_line) {
        if let Some(info) = captures.get(2) {
            identifier.info = Some(info.as_str().trim().to_string());
        }
    }
}

/// Parse `(type $name, ...)(returntype, ...)` off the declaration line.
pub fn parse_signature(text: DeclarationText<'_>) -> Signature {
    let Some(line) = text.lines.get(text.start) else {
        return Signature::default();
    };

    let mut signature = Signature::default();
    let (params_part, rest) = parenthesized_group(line);
    if let Some(params_part) = params_part {
        for param in params_part.split(',') {
            let mut split = param.trim().split(' ');
            if let (Some(data_type), Some(name)) = (split.next(), split.next()) {
                signature.params.push(SignatureParam {
                    data_type: data_type.to_string(),
                    name: name.to_string(),
                    kind: kinds::data_type_to_kind(data_type),
                });
            }
        }
    }
    let (returns_part, _) = parenthesized_group(rest);
    if let Some(returns_part) = returns_part {
        signature.returns_text = returns_part.to_string();
        signature.returns = returns_part
            .split(',')
            .map(|item| kinds::data_type_to_kind(item.trim()))
            .collect();
    }

    signature.params_text = signature
        .params
        .iter()
        .map(|param| format!("{} {}", param.data_type, param.name))
        .collect::<Vec<_>>()
        .join(", ");
    signature
}

/// The content of the first non-empty `(...)` group, plus the text after it.
fn parenthesized_group(line: &str) -> (Option<&str>, &str) {
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

fn process_code_block(
    identifier: &mut Identifier,
    kind: &'static MatchKind,
    text: DeclarationText<'_>,
) {
    let hover = kind.hover.expect("code block requires hover config");
    let start = text.start + hover.block_skip_lines;
    let mut block_lines: Vec<&str> = Vec::new();
    for line in text.lines.iter().skip(start) {
        if patterns::END_OF_BLOCK.is_match(line) {
            break;
        }
        if line.starts_with("//") {
            continue;
        }
        if let Some(inclusions) = hover.config_inclusions {
            if !inclusions.iter().any(|tag| line.starts_with(tag)) {
                continue;
            }
        }
        block_lines.push(line);
    }
    identifier.block = Some(block_lines.join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::kinds::kind;
    use crate::types::MatchKindId;

    #[test]
    fn declaration_captures_info_signature_and_self_data() {
        let lines = vec!["// Adds two numbers", "[proc,add](int $a, int $b)(int)"];
        let text = DeclarationText {
            lines: &lines,
            start: 1,
        };
        let identifier = build_declaration(
            "add",
            kind(MatchKindId::Proc),
            Location::new("scripts/math.rs2", 4, 6),
            text,
            &ExtraData::default(),
        );
        assert_eq!(identifier.info.as_deref(), Some("Adds two numbers"));
        let signature = identifier.signature.unwrap();
        assert_eq!(signature.params.len(), 2);
        assert_eq!(signature.params[0].name, "$a");
        assert_eq!(signature.params[0].kind, MatchKindId::Number);
        assert_eq!(signature.returns, vec![MatchKindId::Number]);
        assert_eq!(signature.params_text, "int $a, int $b");
        assert_eq!(identifier.file_type, "rs2");
    }

    #[test]
    fn config_block_stops_at_next_declaration() {
        let lines = vec![
            "[bronze_sword]",
            "name=Bronze sword",
            "category=sword",
            "",
            "[iron_sword]",
        ];
        let text = DeclarationText {
            lines: &lines,
            start: 0,
        };
        let identifier = build_declaration(
            "bronze_sword",
            kind(MatchKindId::Obj),
            Location::new("items.obj", 0, 1),
            text,
            &ExtraData::default(),
        );
        assert_eq!(
            identifier.block.as_deref(),
            Some("name=Bronze sword\ncategory=sword")
        );
    }

    #[test]
    fn empty_parameter_groups_are_skipped() {
        let lines = vec!["[label,spot]()(int)"];
        let signature = parse_signature(DeclarationText {
            lines: &lines,
            start: 0,
        });
        assert!(signature.params.is_empty());
        assert_eq!(signature.returns, vec![MatchKindId::Number]);
    }
}
