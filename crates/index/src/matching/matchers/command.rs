//! Engine-command rule.
//!
//! Commands are declared with `[command,name]` headers in engine.rs2 and
//! referenced anywhere by bare name. A command that takes parameters only
//! counts as a reference when the word is followed by its argument list.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::matching::patterns;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    let command = store.identifiers.get(&ctx.word.value, MatchKindId::Command)?;

    if ctx.line.file_key.contains("engine.rs2")
        && patterns::TRIGGER_LINE.is_match(&ctx.line.text)
        && ctx.word.index == 1
    {
        return Some(RuleMatch::declaration(MatchKindId::Command));
    }
    if let Some(signature) = &command.signature {
        if !signature.params.is_empty() && ctx.next_char != Some('(') {
            return None;
        }
    }
    Some(RuleMatch::reference(MatchKindId::Command))
}
