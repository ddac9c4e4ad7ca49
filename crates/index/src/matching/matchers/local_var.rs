//! Local variable rule: `$word`, declared when preceded by a `def_<type>`
//! keyword.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::types::MatchKindId;
use once_cell::sync::Lazy;
use regex::Regex;

static DEF_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(int|string|boolean|seq|locshape|component|idk|midi|npc_mode|namedobj|synth|stat|npc_stat|fontmetrics|enum|loc|model|npc|obj|player_uid|spotanim|npc_uid|inv|category|struct|dbrow|interface|dbtable|coord|mesanim|param|queue|weakqueue|timer|softtimer|char|dbcolumn|proc|label)\b",
    )
    .expect("static def-type pattern")
});

pub fn run(ctx: &WordContext<'_>, _store: &IndexStore) -> Option<RuleMatch> {
    if ctx.prev_char != Some('$') {
        return None;
    }
    let Some(prev_word) = ctx.prev_word else {
        return Some(RuleMatch::reference(MatchKindId::LocalVar));
    };
    let prev_value = prev_word
        .value
        .strip_prefix("def_")
        .unwrap_or(&prev_word.value);
    Some(if DEF_TYPE.is_match(prev_value) {
        RuleMatch::declaration(MatchKindId::LocalVar)
    } else {
        RuleMatch::reference(MatchKindId::LocalVar)
    })
}
