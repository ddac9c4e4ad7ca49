use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Key identifying a file inside the workspace (its path as a string).
pub type FileKey = String;

/// Identifies one class of identifiers (the "match kind" of a classified word).
///
/// Kinds are static descriptors: two identifiers sharing a name but carrying
/// different kinds are distinct entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MatchKindId {
    Unknown,
    LocalVar,
    GlobalVar,
    Constant,
    Label,
    Proc,
    Timer,
    Softtimer,
    Queue,
    Seq,
    Spotanim,
    Hunt,
    Loc,
    Npc,
    Obj,
    Inv,
    Enum,
    Struct,
    Param,
    DbRow,
    DbTable,
    DbColumn,
    Interface,
    Component,
    Mesanim,
    Idk,
    Command,
    Trigger,
    Category,
    Model,
    Synth,
    Coordinates,
    Color,
    Number,
    ConfigKey,
}

impl MatchKindId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKindId::Unknown => "UNKNOWN",
            MatchKindId::LocalVar => "LOCAL_VAR",
            MatchKindId::GlobalVar => "GLOBAL_VAR",
            MatchKindId::Constant => "CONSTANT",
            MatchKindId::Label => "LABEL",
            MatchKindId::Proc => "PROC",
            MatchKindId::Timer => "TIMER",
            MatchKindId::Softtimer => "SOFTTIMER",
            MatchKindId::Queue => "QUEUE",
            MatchKindId::Seq => "SEQ",
            MatchKindId::Spotanim => "SPOTANIM",
            MatchKindId::Hunt => "HUNT",
            MatchKindId::Loc => "LOC",
            MatchKindId::Npc => "NPC",
            MatchKindId::Obj => "OBJ",
            MatchKindId::Inv => "INV",
            MatchKindId::Enum => "ENUM",
            MatchKindId::Struct => "STRUCT",
            MatchKindId::Param => "PARAM",
            MatchKindId::DbRow => "DBROW",
            MatchKindId::DbTable => "DBTABLE",
            MatchKindId::DbColumn => "DBCOLUMN",
            MatchKindId::Interface => "INTERFACE",
            MatchKindId::Component => "COMPONENT",
            MatchKindId::Mesanim => "MESANIM",
            MatchKindId::Idk => "IDK",
            MatchKindId::Command => "COMMAND",
            MatchKindId::Trigger => "TRIGGER",
            MatchKindId::Category => "CATEGORY",
            MatchKindId::Model => "MODEL",
            MatchKindId::Synth => "SYNTH",
            MatchKindId::Coordinates => "COORDINATES",
            MatchKindId::Color => "COLOR",
            MatchKindId::Number => "NUMBER",
            MatchKindId::ConfigKey => "CONFIG_KEY",
        }
    }

    /// Inverse of [`as_str`](Self::as_str). Tags are matched
    /// case-insensitively.
    pub fn from_tag(tag: &str) -> Option<MatchKindId> {
        const ALL: &[MatchKindId] = &[
            MatchKindId::Unknown,
            MatchKindId::LocalVar,
            MatchKindId::GlobalVar,
            MatchKindId::Constant,
            MatchKindId::Label,
            MatchKindId::Proc,
            MatchKindId::Timer,
            MatchKindId::Softtimer,
            MatchKindId::Queue,
            MatchKindId::Seq,
            MatchKindId::Spotanim,
            MatchKindId::Hunt,
            MatchKindId::Loc,
            MatchKindId::Npc,
            MatchKindId::Obj,
            MatchKindId::Inv,
            MatchKindId::Enum,
            MatchKindId::Struct,
            MatchKindId::Param,
            MatchKindId::DbRow,
            MatchKindId::DbTable,
            MatchKindId::DbColumn,
            MatchKindId::Interface,
            MatchKindId::Component,
            MatchKindId::Mesanim,
            MatchKindId::Idk,
            MatchKindId::Command,
            MatchKindId::Trigger,
            MatchKindId::Category,
            MatchKindId::Model,
            MatchKindId::Synth,
            MatchKindId::Coordinates,
            MatchKindId::Color,
            MatchKindId::Number,
            MatchKindId::ConfigKey,
        ];
        let tag = tag.to_ascii_uppercase();
        ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for MatchKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite cache key: identifier name plus match kind. A proc named
/// `do_something` keys as `do_something+PROC`, so a constant and a label with
/// the same text never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentifierKey(String);

impl IdentifierKey {
    /// Resolve a key from a name and kind. Fails (returns `None`) for empty
    /// names and for kinds that are never cached under a key.
    pub fn resolve(name: &str, kind: MatchKindId) -> Option<IdentifierKey> {
        if name.is_empty() || kind == MatchKindId::Unknown {
            return None;
        }
        Some(IdentifierKey(format!("{name}+{}", kind.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for IdentifierKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// An encoded (line, column) reference position within one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl Serialize for Pos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}:{}", self.line, self.col))
    }
}

/// The location of a declaration: file plus the start position of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: FileKey,
    pub line: u32,
    pub col: u32,
}

impl Location {
    pub fn new(file: impl Into<FileKey>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

/// One parameter of a parsed script/command signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureParam {
    /// The declared data-type keyword (e.g. `int`, `namedobj`).
    pub data_type: String,
    /// The parameter name, including its `$` sigil.
    pub name: String,
    /// The match kind the data type resolves to.
    pub kind: MatchKindId,
}

/// Parsed parameter/return signature of a script, command, or label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub params: Vec<SignatureParam>,
    pub returns: Vec<MatchKindId>,
    /// Precomputed single-line rendering of the parameters.
    pub params_text: String,
    /// Precomputed single-line rendering of the return types.
    pub returns_text: String,
}

/// Typed extra data attached to an identifier by matchers or post-processors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtraData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_kind: Option<MatchKindId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl ExtraData {
    pub fn is_empty(&self) -> bool {
        *self == ExtraData::default()
    }

    /// Copy every populated field of `other` over this value.
    pub fn merge(&mut self, other: &ExtraData) {
        macro_rules! take {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field.clone();
                }
            };
        }
        take!(data_type);
        take!(input_type);
        take!(output_type);
        take!(table);
        take!(data_types);
        take!(trigger_name);
        take!(category_kind);
        take!(category_name);
    }
}

/// One workspace symbol tracked by the symbol cache.
///
/// Holds everything the editor-facing queries need: the declaration location,
/// every reference position grouped by file, and the hover display payload.
#[derive(Debug, Clone, Serialize)]
pub struct Identifier {
    pub name: String,
    pub kind: MatchKindId,
    /// Externally assigned pack id, when known (e.g. obj id `1234`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Location>,
    /// Encoded reference positions per file. Ordered maps keep the debug
    /// serialization deterministic across rebuilds.
    pub references: BTreeMap<FileKey, BTreeSet<Pos>>,
    pub file_type: String,
    /// Language tag used for syntax-highlighted hover rendering.
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "ExtraData::is_empty")]
    pub extra: ExtraData,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_display: bool,
}

impl Identifier {
    /// Total number of encoded reference positions across all files.
    pub fn reference_count(&self) -> usize {
        self.references.values().map(|set| set.len()).sum()
    }
}

/// A word token extracted from one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub value: String,
    /// Start character offset within the line.
    pub start: u32,
    /// End character offset, inclusive.
    pub end: u32,
    /// Index of this word among the words of its line.
    pub index: u32,
}

/// Annotations produced while normalizing a matched word. The context itself
/// is immutable; any rewriting of the matched text is reported here so a
/// later rename can reconstruct the true on-disk text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Set when the matched word differs from the on-disk text.
    pub modified: bool,
    /// Prefix that was stripped from the on-disk text (`cert_`, `_`).
    pub original_prefix: Option<&'static str>,
    /// Suffix that was stripped from the on-disk text (`_0`, `_q`, ...).
    pub original_suffix: Option<String>,
    /// The matched word is the cert/banknote variant of an obj.
    pub cert: bool,
    /// Pack id captured from the surrounding line, if any.
    pub pack_id: Option<String>,
}

/// The text surrounding a declaration, used to build hover display data:
/// the file's lines from one line above the declaration onward, plus the
/// index of the declaration line within that slice.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationText<'a> {
    pub lines: &'a [&'a str],
    pub start: usize,
}

/// A single text replacement produced by rename planning. Never applied
/// here; the editor layer owns the actual edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileKey,
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
    pub new_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_key_separates_kinds() {
        let proc = IdentifierKey::resolve("do_something", MatchKindId::Proc).unwrap();
        let label = IdentifierKey::resolve("do_something", MatchKindId::Label).unwrap();
        assert_ne!(proc, label);
        assert_eq!(proc.as_str(), "do_something+PROC");
    }

    #[test]
    fn identifier_key_rejects_unknown_and_empty() {
        assert!(IdentifierKey::resolve("", MatchKindId::Proc).is_none());
        assert!(IdentifierKey::resolve("x", MatchKindId::Unknown).is_none());
    }

    #[test]
    fn kind_tags_round_trip() {
        assert_eq!(MatchKindId::from_tag("dbcolumn"), Some(MatchKindId::DbColumn));
        assert_eq!(MatchKindId::from_tag("LOCAL_VAR"), Some(MatchKindId::LocalVar));
        assert_eq!(MatchKindId::from_tag("nonsense"), None);
    }

    #[test]
    fn pos_serializes_as_encoded_string() {
        let json = serde_json::to_string(&Pos::new(12, 4)).unwrap();
        assert_eq!(json, "\"12:4\"");
    }
}
