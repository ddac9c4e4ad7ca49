//! The workspace-wide symbol cache.
//!
//! Maps (name, kind) keys to identifier records and keeps a per-file reverse
//! index of declared and referenced keys, used exclusively for invalidation.

use crate::resource::factory;
use crate::resource::kinds;
use crate::types::{
    DeclarationText, ExtraData, FileKey, Identifier, IdentifierKey, Location, MatchKindId, Pos,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::json;
use std::collections::BTreeMap;

/// The identifier keys declared and referenced within one file.
#[derive(Debug, Default)]
struct FileIdentifiers {
    declarations: FxHashSet<IdentifierKey>,
    references: FxHashSet<IdentifierKey>,
}

#[derive(Debug, Default)]
pub struct IdentifierCache {
    identifiers: FxHashMap<IdentifierKey, Identifier>,
    file_index: FxHashMap<FileKey, FileIdentifiers>,
}

impl IdentifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str, kind: MatchKindId) -> bool {
        IdentifierKey::resolve(name, kind)
            .is_some_and(|key| self.identifiers.contains_key(&key))
    }

    pub fn get(&self, name: &str, kind: MatchKindId) -> Option<&Identifier> {
        let key = IdentifierKey::resolve(name, kind)?;
        self.identifiers.get(&key)
    }

    pub fn get_by_key(&self, key: &IdentifierKey) -> Option<&Identifier> {
        self.identifiers.get(key)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// The nearest enclosing declaration above `line` in `file`: the in-file
    /// declaration with the greatest start line strictly below `line`,
    /// optionally restricted to one kind.
    pub fn parent_declaration(
        &self,
        file: &str,
        line: u32,
        required: Option<MatchKindId>,
    ) -> Option<&Identifier> {
        let file_identifiers = self.file_index.get(file)?;
        let mut best_line = None;
        let mut best = None;
        for key in &file_identifiers.declarations {
            let Some(identifier) = self.identifiers.get(key) else {
                continue;
            };
            let Some(declaration) = &identifier.declaration else {
                continue;
            };
            if required.is_some_and(|required| required != identifier.kind) {
                continue;
            }
            if declaration.line < line && best_line.is_none_or(|current| declaration.line > current)
            {
                best_line = Some(declaration.line);
                best = Some(identifier);
            }
        }
        best
    }

    /// Cache a declaration. An already-cached declaration at the same key is
    /// never overwritten, which makes the second indexing pass idempotent;
    /// orphaned references and a known pack id carry over into the new
    /// record. The declaration's own position is also recorded as a
    /// reference.
    pub fn put(
        &mut self,
        name: &str,
        kind_id: MatchKindId,
        declaration: Location,
        text: DeclarationText<'_>,
        extra: &ExtraData,
    ) -> Option<&Identifier> {
        let key = IdentifierKey::resolve(name, kind_id)?;
        if declaration.file.is_empty() {
            return None;
        }

        if let Some(current) = self.identifiers.get(&key) {
            if current.declaration.is_some() {
                return self.identifiers.get(&key);
            }
        }

        let kind = kinds::kind(kind_id);
        let mut identifier =
            factory::build_declaration(name, kind, declaration.clone(), text, extra);

        if let Some(current) = self.identifiers.remove(&key) {
            if current.pack_id.is_some() {
                identifier.pack_id = current.pack_id;
            }
            // A placeholder's references were collected before the
            // declaration was seen; keep them.
            identifier.references = current.references;
        }

        self.file_entry(&declaration.file).declarations.insert(key.clone());
        self.identifiers.insert(key.clone(), identifier);

        self.put_reference(
            name,
            kind_id,
            &declaration.file,
            declaration.line,
            declaration.col,
            None,
            extra,
        );
        self.identifiers.get(&key)
    }

    /// Cache a reference, creating a minimal placeholder identifier when the
    /// key has not been seen yet.
    #[allow(clippy::too_many_arguments)]
    pub fn put_reference(
        &mut self,
        name: &str,
        kind_id: MatchKindId,
        file: &str,
        line: u32,
        col: u32,
        pack_id: Option<String>,
        extra: &ExtraData,
    ) {
        let Some(key) = IdentifierKey::resolve(name, kind_id) else {
            return;
        };
        if file.is_empty() {
            return;
        }

        if !self.identifiers.contains_key(&key) {
            let kind = kinds::kind(kind_id);
            self.identifiers
                .insert(key.clone(), factory::build_reference(name, kind, extra));
        }

        let identifier = self
            .identifiers
            .get_mut(&key)
            .expect("reference placeholder was just inserted");
        identifier
            .references
            .entry(file.to_string())
            .or_default()
            .insert(Pos::new(line, col));
        if pack_id.is_some() {
            identifier.pack_id = pack_id;
        }

        self.file_entry(file).references.insert(key);
    }

    pub fn clear(&mut self) {
        self.identifiers.clear();
        self.file_index.clear();
    }

    /// Drop everything a file contributed.
    ///
    /// References: the file's reference set is removed from every identifier
    /// it referenced; identifiers left with no declaration and no references
    /// are deleted. Declarations: an identifier still referenced from other
    /// files survives as a declaration-less reference target, otherwise it
    /// is deleted entirely.
    pub fn clear_file(&mut self, file: &str) {
        let Some(file_identifiers) = self.file_index.remove(file) else {
            return;
        };

        for key in &file_identifiers.references {
            let Some(identifier) = self.identifiers.get_mut(key) else {
                continue;
            };
            identifier.references.remove(file);
            if identifier.references.is_empty() && identifier.declaration.is_none() {
                self.identifiers.remove(key);
            }
        }

        for key in &file_identifiers.declarations {
            let Some(identifier) = self.identifiers.get_mut(key) else {
                continue;
            };
            let has_orphaned_refs = !identifier.references.is_empty();
            if has_orphaned_refs {
                identifier.declaration = None;
            } else {
                self.identifiers.remove(key);
            }
        }
    }

    /// Deterministic JSON dump of the whole cache, for the debug export.
    pub fn serialize(&self) -> serde_json::Value {
        let sorted: BTreeMap<&str, &Identifier> = self
            .identifiers
            .iter()
            .map(|(key, identifier)| (key.as_str(), identifier))
            .collect();
        json!(sorted)
    }

    /// All cache keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .identifiers
            .keys()
            .map(|key| key.as_str().to_string())
            .collect();
        keys.sort();
        keys
    }

    fn file_entry(&mut self, file: &str) -> &mut FileIdentifiers {
        self.file_index.entry(file.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text<'a>(lines: &'a [&'a str], start: usize) -> DeclarationText<'a> {
        DeclarationText { lines, start }
    }

    const NO_EXTRA: &ExtraData = &ExtraData {
        data_type: None,
        input_type: None,
        output_type: None,
        table: None,
        data_types: None,
        trigger_name: None,
        category_kind: None,
        category_name: None,
    };

    #[test]
    fn declaration_is_not_overwritten_on_second_pass() {
        let mut cache = IdentifierCache::new();
        let lines = ["[proc,foo](int $x)(int)"];
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("b.rs2", 9, 9),
            text(&lines, 0),
            NO_EXTRA,
        );

        let identifier = cache.get("foo", MatchKindId::Proc).unwrap();
        let declaration = identifier.declaration.as_ref().unwrap();
        assert_eq!(declaration.file, "a.rs2");
        assert_eq!(declaration.line, 0);
    }

    #[test]
    fn placeholder_references_survive_the_declaration() {
        let mut cache = IdentifierCache::new();
        cache.put_reference("foo", MatchKindId::Proc, "b.rs2", 12, 3, None, NO_EXTRA);
        let lines = ["[proc,foo](int $x)(int)"];
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );

        let identifier = cache.get("foo", MatchKindId::Proc).unwrap();
        assert!(identifier.declaration.is_some());
        assert!(identifier.references.contains_key("b.rs2"));
        // Declaration position counts as a reference too.
        assert!(identifier.references.contains_key("a.rs2"));
    }

    #[test]
    fn clear_file_removes_only_that_files_references() {
        let mut cache = IdentifierCache::new();
        let lines = ["[proc,foo]"];
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );
        cache.put_reference("foo", MatchKindId::Proc, "b.rs2", 4, 1, None, NO_EXTRA);

        cache.clear_file("b.rs2");
        let identifier = cache.get("foo", MatchKindId::Proc).unwrap();
        assert!(identifier.declaration.is_some());
        assert!(!identifier.references.contains_key("b.rs2"));
    }

    #[test]
    fn clearing_the_declaring_file_keeps_orphaned_references() {
        let mut cache = IdentifierCache::new();
        let lines = ["[proc,foo]"];
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );
        cache.put_reference("foo", MatchKindId::Proc, "b.rs2", 4, 1, None, NO_EXTRA);

        cache.clear_file("a.rs2");
        let identifier = cache.get("foo", MatchKindId::Proc).unwrap();
        assert!(identifier.declaration.is_none());
        assert!(identifier.references.contains_key("b.rs2"));

        // And with the last references gone, the identifier disappears.
        cache.clear_file("b.rs2");
        assert!(cache.get("foo", MatchKindId::Proc).is_none());
    }

    #[test]
    fn sole_declaration_with_no_outside_references_is_deleted() {
        let mut cache = IdentifierCache::new();
        let lines = ["[proc,foo]"];
        cache.put(
            "foo",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );

        cache.clear_file("a.rs2");
        assert!(cache.get("foo", MatchKindId::Proc).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn parent_declaration_floor_search() {
        let mut cache = IdentifierCache::new();
        let lines = ["[proc,first]", "[proc,second]", "[label,jump]"];
        cache.put(
            "first",
            MatchKindId::Proc,
            Location::new("a.rs2", 0, 6),
            text(&lines, 0),
            NO_EXTRA,
        );
        cache.put(
            "second",
            MatchKindId::Proc,
            Location::new("a.rs2", 10, 6),
            text(&lines, 1),
            NO_EXTRA,
        );
        cache.put(
            "jump",
            MatchKindId::Label,
            Location::new("a.rs2", 20, 7),
            text(&lines, 2),
            NO_EXTRA,
        );

        assert_eq!(
            cache.parent_declaration("a.rs2", 15, None).unwrap().name,
            "second"
        );
        assert_eq!(
            cache
                .parent_declaration("a.rs2", 25, Some(MatchKindId::Proc))
                .unwrap()
                .name,
            "second"
        );
        assert!(cache.parent_declaration("a.rs2", 0, None).is_none());
    }
}
