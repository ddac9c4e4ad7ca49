//! The static match-kind table.
//!
//! Each entry describes one class of identifiers: where it may be declared,
//! whether it is cached, renamed, or displayed, and how hover data is built
//! for it. The table is data, not logic; the matcher chain and the caches
//! consume it.

use crate::resource::post_process;
use crate::types::{Identifier, MatchKindId};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Post-processing hook run once after an identifier is built.
pub type PostProcess = fn(&mut Identifier);

/// Controls how the hover display payload is captured for a kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverConfig {
    /// Language tag for syntax-highlighted code blocks.
    pub language: &'static str,
    /// Capture a parsed parameter/return signature from the declaration line.
    pub signature: bool,
    /// Capture the declaration's code block.
    pub code_block: bool,
    /// Lines to skip before the code block starts (usually the declaration
    /// line itself).
    pub block_skip_lines: usize,
    /// When set, only config lines starting with one of these keys are kept
    /// in the block.
    pub config_inclusions: Option<&'static [&'static str]>,
}

/// Static descriptor for one match kind.
pub struct MatchKind {
    pub id: MatchKindId,
    /// Data-type keywords that resolve to this kind (e.g. `namedobj` -> OBJ).
    pub keywords: &'static [&'static str],
    /// File extensions in which identifiers of this kind may be declared.
    pub file_types: &'static [&'static str],
    /// Whether identifiers of this kind are written to the symbol cache.
    pub cache: bool,
    /// The kind never has a true declaration (it refers to a file on disk).
    pub reference_only: bool,
    pub allow_rename: bool,
    /// Renaming implies renaming the declaring file itself.
    pub rename_file: bool,
    /// Exists only for hover text; never cached.
    pub hover_only: bool,
    /// Terminal no-op match: stops the chain but is never cached or shown.
    pub noop: bool,
    pub hover: Option<HoverConfig>,
    pub post_process: Option<PostProcess>,
}

impl MatchKind {
    const fn base(id: MatchKindId) -> MatchKind {
        MatchKind {
            id,
            keywords: &[],
            file_types: &[],
            cache: true,
            reference_only: false,
            allow_rename: true,
            rename_file: false,
            hover_only: false,
            noop: false,
            hover: None,
            post_process: None,
        }
    }
}

const RS2_HOVER: HoverConfig = HoverConfig {
    language: "runescript",
    signature: true,
    code_block: false,
    block_skip_lines: 1,
    config_inclusions: None,
};

const CONFIG_HOVER: HoverConfig = HoverConfig {
    language: "locconfig",
    signature: false,
    code_block: true,
    block_skip_lines: 1,
    config_inclusions: None,
};

pub static KINDS: &[MatchKind] = &[
    MatchKind {
        cache: false,
        allow_rename: false,
        noop: true,
        ..MatchKind::base(MatchKindId::Unknown)
    },
    MatchKind {
        // Locals live in the active-file cache, never in the symbol cache.
        cache: false,
        ..MatchKind::base(MatchKindId::LocalVar)
    },
    MatchKind {
        keywords: &["var"],
        file_types: &["varp", "varbit", "varn", "vars"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::GlobalVar)
    },
    MatchKind {
        file_types: &["constant"],
        hover: Some(HoverConfig {
            code_block: true,
            block_skip_lines: 0,
            ..CONFIG_HOVER
        }),
        ..MatchKind::base(MatchKindId::Constant)
    },
    MatchKind {
        keywords: &["label"],
        file_types: &["rs2"],
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Label)
    },
    MatchKind {
        keywords: &["proc"],
        file_types: &["rs2"],
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Proc)
    },
    MatchKind {
        keywords: &["timer"],
        file_types: &["rs2"],
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Timer)
    },
    MatchKind {
        keywords: &["softtimer"],
        file_types: &["rs2"],
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Softtimer)
    },
    MatchKind {
        keywords: &["queue", "weakqueue"],
        file_types: &["rs2"],
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Queue)
    },
    MatchKind {
        keywords: &["seq"],
        file_types: &["seq"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Seq)
    },
    MatchKind {
        keywords: &["spotanim"],
        file_types: &["spotanim"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Spotanim)
    },
    MatchKind {
        keywords: &["hunt"],
        file_types: &["hunt"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Hunt)
    },
    MatchKind {
        keywords: &["loc"],
        file_types: &["loc"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Loc)
    },
    MatchKind {
        keywords: &["npc"],
        file_types: &["npc"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Npc)
    },
    MatchKind {
        keywords: &["obj", "namedobj"],
        file_types: &["obj"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Obj)
    },
    MatchKind {
        keywords: &["inv"],
        file_types: &["inv"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Inv)
    },
    MatchKind {
        keywords: &["enum"],
        file_types: &["enum"],
        hover: Some(CONFIG_HOVER),
        post_process: Some(post_process::enum_types),
        ..MatchKind::base(MatchKindId::Enum)
    },
    MatchKind {
        keywords: &["struct"],
        file_types: &["struct"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Struct)
    },
    MatchKind {
        keywords: &["param"],
        file_types: &["param"],
        hover: Some(CONFIG_HOVER),
        post_process: Some(post_process::param_data_type),
        ..MatchKind::base(MatchKindId::Param)
    },
    MatchKind {
        keywords: &["dbrow"],
        file_types: &["dbrow"],
        hover: Some(HoverConfig {
            config_inclusions: Some(&["table"]),
            ..CONFIG_HOVER
        }),
        post_process: Some(post_process::dbrow_table),
        ..MatchKind::base(MatchKindId::DbRow)
    },
    MatchKind {
        keywords: &["dbtable"],
        file_types: &["dbtable"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::DbTable)
    },
    MatchKind {
        keywords: &["dbcolumn"],
        file_types: &["dbtable"],
        // Column declarations are body lines; the block starts on the
        // `column=` line itself.
        hover: Some(HoverConfig {
            block_skip_lines: 0,
            ..CONFIG_HOVER
        }),
        post_process: Some(post_process::dbcolumn_fields),
        ..MatchKind::base(MatchKindId::DbColumn)
    },
    MatchKind {
        keywords: &["interface"],
        file_types: &["pack"],
        allow_rename: false,
        ..MatchKind::base(MatchKindId::Interface)
    },
    MatchKind {
        keywords: &["component"],
        file_types: &["if"],
        hover: Some(CONFIG_HOVER),
        post_process: Some(post_process::component_interface),
        ..MatchKind::base(MatchKindId::Component)
    },
    MatchKind {
        keywords: &["mesanim"],
        file_types: &["mesanim"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Mesanim)
    },
    MatchKind {
        keywords: &["idk"],
        file_types: &["idk"],
        hover: Some(CONFIG_HOVER),
        ..MatchKind::base(MatchKindId::Idk)
    },
    MatchKind {
        // Engine commands are declared with [command,name] lines in engine.rs2.
        file_types: &["rs2"],
        allow_rename: false,
        hover: Some(RS2_HOVER),
        ..MatchKind::base(MatchKindId::Command)
    },
    MatchKind {
        allow_rename: false,
        post_process: Some(post_process::trigger_info),
        ..MatchKind::base(MatchKindId::Trigger)
    },
    MatchKind {
        keywords: &["category"],
        allow_rename: false,
        post_process: Some(post_process::category_value),
        ..MatchKind::base(MatchKindId::Category)
    },
    MatchKind {
        keywords: &["model", "ob2"],
        file_types: &["ob2"],
        reference_only: true,
        rename_file: true,
        post_process: Some(post_process::file_name_info),
        ..MatchKind::base(MatchKindId::Model)
    },
    MatchKind {
        keywords: &["synth"],
        file_types: &["synth"],
        reference_only: true,
        rename_file: true,
        post_process: Some(post_process::file_name_info),
        ..MatchKind::base(MatchKindId::Synth)
    },
    MatchKind {
        keywords: &["coord"],
        cache: false,
        allow_rename: false,
        hover_only: true,
        post_process: Some(post_process::coord_value),
        ..MatchKind::base(MatchKindId::Coordinates)
    },
    MatchKind {
        cache: false,
        allow_rename: false,
        hover_only: true,
        ..MatchKind::base(MatchKindId::Color)
    },
    MatchKind {
        keywords: &["int"],
        cache: false,
        allow_rename: false,
        hover_only: true,
        ..MatchKind::base(MatchKindId::Number)
    },
    MatchKind {
        cache: false,
        allow_rename: false,
        hover_only: true,
        post_process: Some(post_process::config_key_info),
        ..MatchKind::base(MatchKindId::ConfigKey)
    },
];

static BY_ID: Lazy<FxHashMap<MatchKindId, &'static MatchKind>> = Lazy::new(|| {
    KINDS.iter().map(|kind| (kind.id, kind)).collect()
});

static KEYWORD_TO_ID: Lazy<FxHashMap<&'static str, MatchKindId>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for kind in KINDS {
        for keyword in kind.keywords {
            map.insert(*keyword, kind.id);
        }
    }
    map
});

pub fn kind(id: MatchKindId) -> &'static MatchKind {
    BY_ID.get(&id).expect("every MatchKindId has a table entry")
}

/// Resolve a data-type keyword (e.g. `namedobj`) to its match kind.
/// Unrecognized keywords resolve to `Unknown`.
pub fn data_type_to_kind(keyword: &str) -> MatchKindId {
    KEYWORD_TO_ID
        .get(keyword)
        .copied()
        .unwrap_or(MatchKindId::Unknown)
}

/// The set of file extensions monitored by the workspace indexer: every
/// extension a non-reference-only kind declares in, plus pack and map files.
pub fn monitored_file_types() -> FxHashSet<&'static str> {
    let mut types: FxHashSet<&'static str> = FxHashSet::default();
    types.insert("pack");
    types.insert("jm2");
    for kind in KINDS.iter().filter(|kind| !kind.reference_only) {
        types.extend(kind.file_types.iter().copied());
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_id_is_in_the_table() {
        assert_eq!(kind(MatchKindId::Proc).id, MatchKindId::Proc);
        assert_eq!(kind(MatchKindId::Unknown).id, MatchKindId::Unknown);
        assert!(kind(MatchKindId::Unknown).noop);
    }

    #[test]
    fn keywords_resolve_to_kinds() {
        assert_eq!(data_type_to_kind("namedobj"), MatchKindId::Obj);
        assert_eq!(data_type_to_kind("weakqueue"), MatchKindId::Queue);
        assert_eq!(data_type_to_kind("midi"), MatchKindId::Unknown);
    }

    #[test]
    fn monitored_types_cover_script_and_config_dialects() {
        let types = monitored_file_types();
        assert!(types.contains("rs2"));
        assert!(types.contains("varp"));
        assert!(types.contains("pack"));
        assert!(!types.contains("ob2"));
    }
}
