//! Parenthesized-argument rule.
//!
//! Classifies a word by the signature of the call it sits inside: engine
//! command arguments, `~proc` and `@label` arguments, `queue(...)` dynamic
//! arguments, and `return(...)` values typed by the enclosing script's
//! declared returns.
//!
//! The scan walks backward from the cursor to the opening parenthesis,
//! counting commas while skipping string literals, `<...>` interpolation,
//! and nested parenthesis groups.

use super::RuleMatch;
use crate::cache::IndexStore;
use crate::matching::context::{word_at, WordContext};
use crate::types::{Identifier, MatchKindId, Word};

pub fn run(ctx: &WordContext<'_>, store: &IndexStore) -> Option<RuleMatch> {
    if ctx.line.file_type != "rs2" {
        return None;
    }
    let (name_word, param_index) =
        identifier_and_param_index(&ctx.line.text, ctx.cursor, &ctx.line.words)?;
    let name = name_word.value.as_str();

    if name == "return" {
        let key = store.return_lines.get(ctx.line.line, &ctx.line.file_key)?;
        let identifier = store.identifiers.get_by_key(key)?;
        let returns = &identifier.signature.as_ref()?.returns;
        let kind = *returns.get(param_index)?;
        return Some(RuleMatch::reference(kind));
    }

    let prev = name_word
        .start
        .checked_sub(1)
        .and_then(|at| ctx.line.text.as_bytes().get(at as usize).copied())
        .map(|byte| byte as char);
    let mut index_offset = 0usize;
    let identifier: Option<&Identifier> = match name {
        // The first arguments of a queue call belong to the queue command
        // itself; the rest follow the named queue script's signature.
        "queue" | "longqueue" => {
            index_offset = if name == "queue" { 2 } else { 3 };
            if param_index < index_offset {
                index_offset = 0;
                store.identifiers.get(name, MatchKindId::Queue)
            } else {
                word_at(&ctx.line.words, name_word.end + 2)
                    .and_then(|queue| store.identifiers.get(&queue.value, MatchKindId::Queue))
            }
        }
        _ if prev == Some('@') => store.identifiers.get(name, MatchKindId::Label),
        _ if prev == Some('~') => store.identifiers.get(name, MatchKindId::Proc),
        _ => store.identifiers.get(name, MatchKindId::Command),
    };

    let signature = identifier?.signature.as_ref()?;
    let param = signature.params.get(param_index.checked_sub(index_offset)?)?;
    Some(RuleMatch::reference(param.kind))
}

/// Walk backward from the cursor to the call's opening parenthesis. Returns
/// the word naming the call plus the comma-separated argument position the
/// cursor sits at.
fn identifier_and_param_index<'a>(
    line: &str,
    cursor: u32,
    words: &'a [Word],
) -> Option<(&'a Word, usize)> {
    let (clipped, string_state) = initialize_string(line, cursor);
    let text = clipped.unwrap_or(line);
    let bytes = text.as_bytes();

    let mut in_string = string_state;
    let mut in_interpolated = 0u32;
    let mut in_params = 0u32;
    let mut param_index = 0usize;

    for i in (0..=cursor as usize).rev() {
        // The cursor may sit past the clipped text's end; those positions
        // are no-ops.
        let Some(&byte) = bytes.get(i) else {
            continue;
        };
        let ch = byte as char;

        if ch == '>' {
            in_interpolated += 1;
        }
        if in_interpolated > 0 {
            if ch == '<' {
                in_interpolated -= 1;
            }
            continue;
        }

        let unescaped_quote = ch == '"' && i > 0 && bytes[i - 1] != b'\\';
        if in_string {
            if unescaped_quote {
                in_string = false;
            }
            continue;
        } else if unescaped_quote {
            in_string = true;
            continue;
        }

        if ch == ')' {
            in_params += 1;
        }
        if in_params > 0 {
            if ch == '(' {
                in_params -= 1;
            }
            continue;
        }

        if ch == ',' {
            param_index += 1;
        }
        // Hit the start of an interpolation without finding a call.
        if ch == '<' {
            return None;
        }
        if ch == '(' {
            let name = word_at(words, u32::try_from(i.checked_sub(2)?).ok()?)?;
            return Some((name, param_index));
        }
    }
    None
}

/// Determine whether the cursor starts inside a string literal, scanning
/// forward to the end of the line; when it sits inside interpolated code,
/// the backward scan is clipped to that interpolation.
fn initialize_string(line: &str, cursor: u32) -> (Option<&str>, bool) {
    let bytes = line.as_bytes();
    let mut quotes = 0u32;
    let mut interpolated = 0u32;
    for i in (cursor as usize)..bytes.len() {
        let ch = bytes[i] as char;
        if ch == '"' && i > 0 && bytes[i - 1] != b'\\' {
            quotes += 1;
        }
        if ch == '>' {
            if interpolated == 0 {
                return (Some(&line[..i.saturating_sub(1)]), quotes % 2 == 1);
            }
            interpolated -= 1;
        }
        if ch == '<' {
            interpolated += 1;
        }
    }
    (None, quotes % 2 == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::context::get_words;
    use crate::matching::patterns;

    fn scan(line: &str, cursor: u32) -> Option<(String, usize)> {
        let words = get_words(line, &patterns::WORD);
        identifier_and_param_index(line, cursor, &words)
            .map(|(word, index)| (word.value.clone(), index))
    }

    #[test]
    fn plain_argument_positions() {
        let line = "anim(walk_seq, 10);";
        assert_eq!(scan(line, 6), Some(("anim".to_string(), 0)));
        assert_eq!(scan(line, 16), Some(("anim".to_string(), 1)));
    }

    #[test]
    fn commas_inside_strings_are_ignored() {
        let line = r#"foo("a,b", 1)"#;
        assert_eq!(scan(line, 11), Some(("foo".to_string(), 1)));
    }

    #[test]
    fn commas_inside_interpolation_are_ignored() {
        let line = "mes(\"total: <tostring(calc($a + $b), 1)>\");";
        assert_eq!(scan(line, 5), Some(("mes".to_string(), 0)));
    }

    #[test]
    fn nested_calls_resolve_to_the_inner_call() {
        let line = "foo(bar(1, 2), 3)";
        assert_eq!(scan(line, 11), Some(("bar".to_string(), 1)));
        assert_eq!(scan(line, 15), Some(("foo".to_string(), 1)));
    }

    #[test]
    fn outside_any_call_yields_nothing() {
        assert_eq!(scan("def_int $x = 1;", 9), None);
    }
}
