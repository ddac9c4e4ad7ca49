//! Sigil rule: the character before a word pins its class.
//!
//! `^word` constants, `%word` global vars, `@word` labels, `~word` procs,
//! and `p,word` mesanims.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, _store: &IndexStore) -> Option<RuleMatch> {
    match ctx.prev_char? {
        '^' => Some(if ctx.line.file_type == "constant" {
            RuleMatch::declaration(MatchKindId::Constant)
        } else {
            RuleMatch::reference(MatchKindId::Constant)
        }),
        '%' => Some(RuleMatch::reference(MatchKindId::GlobalVar)),
        // `@@` is a text color code, not a label.
        '@' if ctx.next_char != Some('@') => Some(RuleMatch::reference(MatchKindId::Label)),
        '~' => Some(RuleMatch::reference(MatchKindId::Proc)),
        ',' if ctx.prev_word.is_some_and(|prev| prev.value == "p") => {
            Some(RuleMatch::reference(MatchKindId::Mesanim))
        }
        _ => None,
    }
}
