//! Per-file "value active from this line onward" lookup structure.
//!
//! Breakpoints are written once per triggering line during indexing and
//! never merged. A query returns the value of the breakpoint with the
//! greatest start line not exceeding the queried line.

use crate::types::FileKey;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct LineRangeCache<T> {
    breakpoints: FxHashMap<FileKey, BTreeMap<u32, T>>,
}

impl<T> Default for LineRangeCache<T> {
    fn default() -> Self {
        Self {
            breakpoints: FxHashMap::default(),
        }
    }
}

impl<T: Clone> LineRangeCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` as active from `start_line` onward in `file`.
    pub fn put(&mut self, start_line: u32, value: T, file: &str) {
        self.breakpoints
            .entry(file.to_string())
            .or_default()
            .insert(start_line, value);
    }

    /// Floor lookup: the value of the closest breakpoint at or before `line`.
    pub fn get(&self, line: u32, file: &str) -> Option<&T> {
        self.breakpoints
            .get(file)?
            .range(..=line)
            .next_back()
            .map(|(_, value)| value)
    }

    pub fn clear_file(&mut self, file: &str) {
        self.breakpoints.remove(file);
    }

    pub fn clear(&mut self) {
        self.breakpoints.clear();
    }
}
