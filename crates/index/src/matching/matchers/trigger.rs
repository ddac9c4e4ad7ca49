//! Trigger-header rule: `[trigger,name]` lines in script files.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::matching::patterns;
use crate::resource::triggers;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, _store: &IndexStore) -> Option<RuleMatch> {
    if ctx.line.file_type != "rs2" {
        return None;
    }
    if !patterns::TRIGGER_LINE.is_match(&ctx.line.text) || ctx.word.index > 1 {
        return None;
    }
    let trigger = triggers::trigger(&ctx.line.words[0].value.to_lowercase())?;

    if ctx.word.index == 0 {
        let mut claimed = RuleMatch::reference(MatchKindId::Trigger);
        claimed.extra.trigger_name = ctx.line.words.get(1).map(|word| word.value.clone());
        return Some(claimed);
    }
    // A `_name` in place of the entity name attaches the script to a whole
    // category of that entity kind.
    if let Some(category_name) = ctx.word.value.strip_prefix('_') {
        let mut claimed = RuleMatch::reference(MatchKindId::Category);
        claimed.extra.category_kind = Some(trigger.kind);
        claimed.extra.category_name = Some(category_name.to_string());
        return Some(claimed);
    }
    Some(if trigger.declaration {
        RuleMatch::declaration(trigger.kind)
    } else {
        RuleMatch::reference(trigger.kind)
    })
}
