//! Word classification.
//!
//! A line is tokenized into words; each word runs through the rule chain in
//! priority order and the first claim wins. The claimed match is then
//! normalized: some kinds rewrite the matched word (qualified component and
//! column names, stripped `cert_`/`_` prefixes, stripped model shape
//! suffixes), reported through annotations so rename can reconstruct the
//! on-disk text.

pub mod context;
pub mod matchers;
pub mod patterns;

use crate::cache::IndexStore;
use crate::resource::kinds::{self, MatchKind};
use crate::types::{Annotations, ExtraData, MatchKindId};
use context::{LineContext, WordContext};
use matchers::RuleMatch;

/// One classified word, after normalization.
#[derive(Debug, Clone)]
pub struct WordMatch {
    pub kind: MatchKindId,
    pub declaration: bool,
    /// The matched name, possibly rewritten from the on-disk text.
    pub word: String,
    /// Start column of the matched name within its line.
    pub start: u32,
    pub extra: ExtraData,
    pub annotations: Annotations,
}

impl WordMatch {
    pub fn kind(&self) -> &'static MatchKind {
        kinds::kind(self.kind)
    }
}

/// Classify the word at a cursor position.
pub fn match_word_at(
    store: &IndexStore,
    line_text: &str,
    line: u32,
    file_key: &str,
    cursor: u32,
) -> Option<WordMatch> {
    let line_ctx = LineContext::build(line_text, line, file_key);
    let word = context::word_at(&line_ctx.words, cursor)?;
    let word_ctx = line_ctx.word_context(word.index as usize, cursor);
    run_chain(&word_ctx, store)
}

/// Classify every word of a line. The result is parallel to the line's word
/// list; unclaimed words yield `None`.
pub fn match_words(
    store: &IndexStore,
    line_text: &str,
    line: u32,
    file_key: &str,
) -> Vec<Option<WordMatch>> {
    let line_ctx = LineContext::build(line_text, line, file_key);
    (0..line_ctx.words.len())
        .map(|index| {
            let cursor = line_ctx.words[index].start;
            let word_ctx = line_ctx.word_context(index, cursor);
            run_chain(&word_ctx, store)
        })
        .collect()
}

fn run_chain(ctx: &WordContext<'_>, store: &IndexStore) -> Option<WordMatch> {
    // `null` is the script language's empty value, never an identifier.
    if ctx.word.value == "null" {
        return None;
    }
    for matcher in matchers::MATCHERS {
        if let Some(claimed) = (matcher.run)(ctx, store) {
            return response(claimed, ctx, store);
        }
    }
    None
}

/// Normalize a claimed match into its final word text and annotations.
fn response(claimed: RuleMatch, ctx: &WordContext<'_>, store: &IndexStore) -> Option<WordMatch> {
    let mut word = ctx.word.value.clone();
    let mut start = ctx.word.start;
    let mut annotations = Annotations {
        pack_id: claimed.pack_id,
        ..Annotations::default()
    };

    match claimed.kind {
        // Bare component names qualify against their declaring interface,
        // which is the file's base name.
        MatchKindId::Component if !word.contains(':') => {
            word = format!("{}:{word}", ctx.line.file_name);
            annotations.modified = true;
        }
        // Bare column names qualify against the enclosing table (or the
        // enclosing row's table); without a resolvable parent there is no
        // usable identity, so the match is dropped.
        MatchKindId::DbColumn if !word.contains(':') => {
            let required = if ctx.line.file_type == "dbtable" {
                MatchKindId::DbTable
            } else {
                MatchKindId::DbRow
            };
            let parent = store.identifiers.parent_declaration(
                &ctx.line.file_key,
                ctx.line.line,
                Some(required),
            )?;
            let table = if ctx.line.file_type == "dbrow" {
                parent.extra.table.clone()?
            } else {
                parent.name.clone()
            };
            word = format!("{table}:{word}");
            annotations.modified = true;
        }
        MatchKindId::Obj if word.starts_with("cert_") => {
            word = word[5..].to_string();
            start += 5;
            annotations.original_prefix = Some("cert_");
            annotations.cert = true;
            annotations.modified = true;
        }
        MatchKindId::Category if word.starts_with('_') => {
            word = word[1..].to_string();
            start += 1;
            annotations.original_prefix = Some("_");
            annotations.modified = true;
        }
        // Loc models share one model file across shapes; the shape suffix
        // (`_2`, `_q`) is not part of the model name.
        MatchKindId::Model if patterns::LOC_MODEL.is_match(&word) => {
            if let Some(last_underscore) = word.rfind('_') {
                annotations.original_suffix = Some(word[last_underscore..].to_string());
                word.truncate(last_underscore);
                annotations.modified = true;
            }
        }
        _ => {}
    }

    Some(WordMatch {
        kind: claimed.kind,
        declaration: claimed.declaration,
        word,
        start,
        extra: claimed.extra,
        annotations,
    })
}
