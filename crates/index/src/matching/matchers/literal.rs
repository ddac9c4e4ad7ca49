//! Literal rule: coordinates, hex colors, and bare numbers.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::matching::patterns;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, _store: &IndexStore) -> Option<RuleMatch> {
    let word = &ctx.word.value;
    if patterns::COORD.is_match(word) {
        return Some(RuleMatch::reference(MatchKindId::Coordinates));
    }
    if patterns::COLOR.is_match(word) {
        return Some(RuleMatch::reference(MatchKindId::Color));
    }
    if patterns::NUMBER.is_match(word) {
        return Some(RuleMatch::reference(MatchKindId::Number));
    }
    None
}
