//! Pack-file rule: `id<TAB>name` lines mapping pack ids to names.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::resource::kinds;
use crate::types::MatchKindId;

pub fn run(ctx: &WordContext<'_>, _store: &IndexStore) -> Option<RuleMatch> {
    if ctx.line.file_type != "pack" || ctx.word.index != 1 {
        return None;
    }
    let file_name = ctx.line.file_name.as_str();
    let kind = if kinds::kind(MatchKindId::GlobalVar)
        .file_types
        .contains(&file_name)
    {
        MatchKindId::GlobalVar
    } else if file_name == "interface" && ctx.word.value.contains(':') {
        MatchKindId::Component
    } else {
        kinds::data_type_to_kind(file_name)
    };

    let mut claimed = RuleMatch::reference(kind);
    if kind != MatchKindId::Unknown {
        claimed.pack_id = Some(ctx.line.words[0].value.clone());
    }
    Some(claimed)
}
