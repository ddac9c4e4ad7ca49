//! The classification rule chain.
//!
//! Rules are a closed, explicitly ordered list. Each rule inspects one word
//! in its line context (plus the index state) and either claims the word or
//! passes. The first claim wins; later rules never run.

mod command;
mod config;
mod literal;
mod local_var;
mod pack;
mod params;
mod prev_char;
mod switch_case;
mod trigger;

use crate::cache::IndexStore;
use crate::matching::context::WordContext;
use crate::types::{ExtraData, MatchKindId};

/// The raw outcome of one rule claiming a word, before response
/// normalization.
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub kind: MatchKindId,
    pub declaration: bool,
    pub extra: ExtraData,
    /// Pack id read off the surrounding line, when the rule knows it.
    pub pack_id: Option<String>,
}

impl RuleMatch {
    pub fn reference(kind: MatchKindId) -> Self {
        Self {
            kind,
            declaration: false,
            extra: ExtraData::default(),
            pack_id: None,
        }
    }

    pub fn declaration(kind: MatchKindId) -> Self {
        Self {
            declaration: true,
            ..Self::reference(kind)
        }
    }
}

pub type MatcherFn = fn(&WordContext<'_>, &IndexStore) -> Option<RuleMatch>;

pub struct Matcher {
    pub name: &'static str,
    pub priority: u32,
    pub run: MatcherFn,
}

/// Evaluation order. Priorities are spaced so a future rule can slot in
/// between two existing ones without renumbering.
pub static MATCHERS: &[Matcher] = &[
    Matcher {
        name: "pack",
        priority: 1000,
        run: pack::run,
    },
    Matcher {
        name: "literal",
        priority: 2000,
        run: literal::run,
    },
    Matcher {
        name: "command",
        priority: 3000,
        run: command::run,
    },
    Matcher {
        name: "local_var",
        priority: 4000,
        run: local_var::run,
    },
    Matcher {
        name: "prev_char",
        priority: 5000,
        run: prev_char::run,
    },
    Matcher {
        name: "trigger",
        priority: 6000,
        run: trigger::run,
    },
    Matcher {
        name: "config",
        priority: 7000,
        run: config::run,
    },
    Matcher {
        name: "switch_case",
        priority: 8000,
        run: switch_case::run,
    },
    Matcher {
        name: "params",
        priority: 9000,
        run: params::run,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order_is_fixed() {
        let names: Vec<&str> = MATCHERS.iter().map(|matcher| matcher.name).collect();
        assert_eq!(
            names,
            [
                "pack",
                "literal",
                "command",
                "local_var",
                "prev_char",
                "trigger",
                "config",
                "switch_case",
                "params"
            ]
        );
        assert!(
            MATCHERS
                .windows(2)
                .all(|pair| pair[0].priority < pair[1].priority)
        );
    }
}
