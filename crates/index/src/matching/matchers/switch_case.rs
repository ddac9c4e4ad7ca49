//! Switch-case rule: values on a `case x, y :` line take the kind of the
//! enclosing switch statement's operand, recorded per line during indexing.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::matching::patterns;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    if ctx.line.file_type != "rs2"
        || ctx.word.index == 0
        || ctx.word.value == "default"
        || !patterns::SWITCH_CASE.is_match(&ctx.line.text)
    {
        return None;
    }
    let colon = ctx.line.text.find(" :")?;
    if ctx.cursor as usize >= colon {
        return None;
    }
    let kind = store
        .switch_lines
        .get(ctx.line.line, &ctx.line.file_key)
        .copied()
        .unwrap_or(MatchKindId::Unknown);
    Some(RuleMatch::reference(kind))
}
