//! The regex gates used across tokenization and line classification.

use once_cell::sync::Lazy;
use regex::Regex;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern")
}

/// Maximal word tokens: identifier characters plus `:` for qualified names.
pub static WORD: Lazy<Regex> = Lazy::new(|| pattern(r"[A-Za-z0-9_:]+"));

/// Word tokens for the active-file scanner, which needs the `$` sigil kept
/// attached to local variable names.
pub static LOCAL_VAR_WORD: Lazy<Regex> = Lazy::new(|| pattern(r"[$A-Za-z0-9_]+"));

/// A script trigger header: `[trigger,name]`.
pub static TRIGGER_LINE: Lazy<Regex> = Lazy::new(|| pattern(r"^\[\w+,\w+\]"));

/// The full definition portion of a trigger header, including the optional
/// parameter and return groups: `[trigger,name](...)(...)`.
pub static TRIGGER_DEFINITION: Lazy<Regex> =
    Lazy::new(|| pattern(r"^\[\w+,\w+\](?:\([^)]*\))?(?:\([^)]*\))?"));

/// A config-file declaration header: `[name]`.
pub static CONFIG_DECLARATION: Lazy<Regex> = Lazy::new(|| pattern(r"^\[\w+\]$"));

/// A config body line: `key=value,...`.
pub static CONFIG_LINE: Lazy<Regex> = Lazy::new(|| pattern(r"^\w+="));

/// A switch-case line.
pub static SWITCH_CASE: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*case\s"));

/// A packed coordinate literal: `level_mx_mz_lx_lz`.
pub static COORD: Lazy<Regex> = Lazy::new(|| pattern(r"^\d+_\d+_\d+_\d+_\d+$"));

/// A 24-bit hex color literal.
pub static COLOR: Lazy<Regex> = Lazy::new(|| pattern(r"^0x[0-9a-fA-F]{6}$"));

/// A bare integer literal.
pub static NUMBER: Lazy<Regex> = Lazy::new(|| pattern(r"^-?\d+$"));

/// A loc model name carrying a shape suffix (`tree_2`, `tree_q`).
pub static LOC_MODEL: Lazy<Regex> = Lazy::new(|| pattern(r"^\w+_(?:\d+|[a-z])$"));

/// A numeric map cell entry (optionally letter-prefixed), never a name.
pub static MAP_CELL: Lazy<Regex> = Lazy::new(|| pattern(r"^\w?\d+$"));

/// An info comment line preceding a declaration; group 2 is the text.
pub static INFO_LINE: Lazy<Regex> = Lazy::new(|| pattern(r"^(\s*//+\s*)(.*\S)\s*$"));

/// A line that terminates a hover code block (blank, or a new declaration).
pub static END_OF_BLOCK: Lazy<Regex> = Lazy::new(|| pattern(r"^(\s*$|\[)"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_line_gate() {
        assert!(TRIGGER_LINE.is_match("[proc,foo](int $x)(int)"));
        assert!(TRIGGER_LINE.is_match("[oploc1,tree]"));
        assert!(!TRIGGER_LINE.is_match("[name]"));
        assert!(!TRIGGER_LINE.is_match("x = [proc,foo]"));
    }

    #[test]
    fn literal_gates() {
        assert!(COORD.is_match("0_50_50_20_20"));
        assert!(COLOR.is_match("0xFF00FF"));
        assert!(NUMBER.is_match("-42"));
        assert!(!NUMBER.is_match("42x"));
    }

    #[test]
    fn trigger_definition_spans_params_and_returns() {
        let m = TRIGGER_DEFINITION.find("[proc,foo](int $x)(int) def_int $y = 0;");
        assert_eq!(m.unwrap().as_str(), "[proc,foo](int $x)(int)");
    }
}
