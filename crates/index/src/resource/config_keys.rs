//! Static config-key parameter shapes.
//!
//! A config body line reads `key=param1,param2,...`. Each known key lists the
//! data type of every parameter position and whether that position declares
//! or references the resolved kind. Keys whose shape depends on another
//! cached identifier (`param`, `val`, `data`) are handled by hand in the
//! config matcher and only listed here.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
pub struct ConfigParam {
    /// Data-type keyword of this parameter position.
    pub data_type: &'static str,
    /// This position declares (rather than references) the resolved kind.
    pub declaration: bool,
}

const fn param(data_type: &'static str) -> ConfigParam {
    ConfigParam {
        data_type,
        declaration: false,
    }
}

const fn declaring(data_type: &'static str) -> ConfigParam {
    ConfigParam {
        data_type,
        declaration: true,
    }
}

pub struct RegexConfigKey {
    pub regex: Regex,
    pub params: &'static [ConfigParam],
}

/// Keys whose parameter shape depends on another cached identifier.
pub const SPECIAL_CASE_KEYS: &[&str] = &["val", "param", "data"];

static WALKANIM: [ConfigParam; 4] = [param("seq"), param("seq"), param("seq"), param("seq")];
static VAR: [ConfigParam; 1] = [param("var")];
static MULTILOC: [ConfigParam; 2] = [param("int"), param("loc")];
static MULTINPC: [ConfigParam; 2] = [param("int"), param("npc")];
static CATEGORY: [ConfigParam; 1] = [param("category")];
static HUNTMODE: [ConfigParam; 1] = [param("hunt")];
static TABLE: [ConfigParam; 1] = [param("dbtable")];
static COLUMN: [ConfigParam; 1] = [declaring("dbcolumn")];

static STATIC_KEYS: Lazy<FxHashMap<&'static str, &'static [ConfigParam]>> = Lazy::new(|| {
    let mut map: FxHashMap<&'static str, &'static [ConfigParam]> = FxHashMap::default();
    map.insert("walkanim", &WALKANIM[..]);
    map.insert("multivar", &VAR[..]);
    map.insert("multiloc", &MULTILOC[..]);
    map.insert("multinpc", &MULTINPC[..]);
    map.insert("basevar", &VAR[..]);
    map.insert("category", &CATEGORY[..]);
    map.insert("huntmode", &HUNTMODE[..]);
    map.insert("table", &TABLE[..]);
    map.insert("column", &COLUMN[..]);
    map
});

/// Regex-shaped keys grouped by the file type they apply to.
static REGEX_KEYS: Lazy<FxHashMap<&'static str, Vec<RegexConfigKey>>> = Lazy::new(|| {
    static STOCK: [ConfigParam; 3] = [param("obj"), param("int"), param("int")];
    static COUNT: [ConfigParam; 2] = [param("obj"), param("int")];
    static FRAME: [ConfigParam; 1] = [param("frame")];
    static MODEL: [ConfigParam; 1] = [param("ob2")];
    static ANIM: [ConfigParam; 1] = [param("seq")];
    static HELD: [ConfigParam; 1] = [param("obj")];

    struct Entry {
        pattern: &'static str,
        params: &'static [ConfigParam],
        file_types: &'static [&'static str],
    }
    let entries = [
        Entry {
            pattern: r"^stock\d+$",
            params: &STOCK,
            file_types: &["inv"],
        },
        Entry {
            pattern: r"^count\d+$",
            params: &COUNT,
            file_types: &["obj"],
        },
        Entry {
            pattern: r"^frame\d+$",
            params: &FRAME,
            file_types: &["seq"],
        },
        Entry {
            pattern: r"^(model|head|womanwear|manwear|womanhead|manhead|activemodel)\d*$",
            params: &MODEL,
            file_types: &["npc", "loc", "obj", "spotanim", "if", "idk"],
        },
        Entry {
            pattern: r"^\w*anim\w*$",
            params: &ANIM,
            file_types: &["loc", "npc", "if", "spotanim"],
        },
        Entry {
            pattern: r"^(replaceheldleft|replaceheldright)$",
            params: &HELD,
            file_types: &["seq"],
        },
    ];

    let mut map: FxHashMap<&'static str, Vec<RegexConfigKey>> = FxHashMap::default();
    for entry in entries {
        for file_type in entry.file_types {
            map.entry(file_type).or_default().push(RegexConfigKey {
                regex: Regex::new(entry.pattern).expect("static config key pattern"),
                params: entry.params,
            });
        }
    }
    map
});

/// Look up a statically shaped key.
pub fn static_key(key: &str) -> Option<&'static [ConfigParam]> {
    STATIC_KEYS.get(key).copied()
}

/// Look up a regex-shaped key for the given file type.
pub fn regex_key(key: &str, file_type: &str) -> Option<&'static [ConfigParam]> {
    REGEX_KEYS
        .get(file_type)?
        .iter()
        .find(|entry| entry.regex.is_match(key))
        .map(|entry| entry.params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_keys_resolve() {
        let params = static_key("walkanim").unwrap();
        assert_eq!(params.len(), 4);
        assert!(!params[0].declaration);
        assert!(static_key("column").unwrap()[0].declaration);
    }

    #[test]
    fn regex_keys_are_scoped_to_file_types() {
        assert!(regex_key("stock3", "inv").is_some());
        assert!(regex_key("stock3", "obj").is_none());
        assert!(regex_key("readyanim", "loc").is_some());
    }
}
