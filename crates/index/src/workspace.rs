//! Workspace index orchestration.
//!
//! Owns all index state and exposes the editor-facing surface: full and
//! per-file rebuilds, file lifecycle events, the debounced active-file
//! rebuild, word classification queries, and rename planning. Rebuild entry
//! points take `&mut self`, so overlapped rebuilds cannot be expressed.

use crate::cache::active_file::{ActiveFileCache, ScriptBlock};
use crate::cache::IndexStore;
use crate::indexing;
use crate::matching::{self, WordMatch};
use crate::rename::{self, RenameError};
use crate::resource::kinds;
use crate::types::{FileKey, Identifier, IdentifierKey, MatchKindId, TextEdit};
use anyhow::Result;
use futures::future::join_all;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Quiet window before a pending active-file rebuild runs; a new request
/// within the window replaces it.
pub const ACTIVE_FILE_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy)]
pub struct RebuildStats {
    pub files: usize,
    pub identifiers: usize,
    pub elapsed: Duration,
}

pub struct WorkspaceIndex {
    root: PathBuf,
    store: IndexStore,
    active: Arc<Mutex<ActiveFileCache>>,
    pending_active_rebuild: Option<JoinHandle<()>>,
}

impl WorkspaceIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: IndexStore::new(),
            active: Arc::new(Mutex::new(ActiveFileCache::new())),
            pending_active_rebuild: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// The workspace key for a path: its root-relative form with `/`
    /// separators.
    pub fn file_key(&self, path: &Path) -> FileKey {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }

    fn is_monitored(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| kinds::monitored_file_types().contains(ext))
    }

    /// Every monitored file under the workspace root.
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&self.root).hidden(false).build().flatten() {
            let is_file = entry.file_type().is_some_and(|file_type| file_type.is_file());
            if is_file && Self::is_monitored(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        files
    }

    /// Rebuild the whole index from disk.
    ///
    /// All reads are issued concurrently; parsing then runs twice over every
    /// file, because several classification rules (command arity, dynamic
    /// queue parameters, column type resolution) depend on declarations that
    /// may live in a file parsed later. The second pass only starts after
    /// the first has fully completed.
    pub async fn rebuild_all(&mut self) -> Result<RebuildStats> {
        let started = Instant::now();
        self.store.clear_all();

        let files = self.collect_files();
        let contents = self.read_files(&files).await;
        for _pass in 0..2 {
            for (file_key, text) in &contents {
                indexing::index_file(&mut self.store, file_key, text);
            }
        }

        let stats = RebuildStats {
            files: contents.len(),
            identifiers: self.store.identifiers.len(),
            elapsed: started.elapsed(),
        };
        info!(
            files = stats.files,
            identifiers = stats.identifiers,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "workspace index rebuilt"
        );
        Ok(stats)
    }

    /// Single-pass reindex of one file, used on save. Dependent declarations
    /// are assumed stable already.
    pub async fn rebuild_file(&mut self, path: &Path) -> Result<()> {
        if !Self::is_monitored(path) {
            return Ok(());
        }
        let file_key = self.file_key(path);
        self.store.clear_file(&file_key);
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                indexing::index_file(&mut self.store, &file_key, &text);
                debug!(file = %file_key, "file reindexed");
            }
            Err(error) => warn!(file = %file_key, %error, "skipping unreadable file"),
        }
        Ok(())
    }

    pub async fn create_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            self.rebuild_file(path).await?;
        }
        Ok(())
    }

    pub fn clear_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            if Self::is_monitored(path) {
                let file_key = self.file_key(path);
                self.store.clear_file(&file_key);
            }
        }
    }

    /// A rename clears the old key and reindexes under the new one.
    pub async fn rename_files(&mut self, pairs: &[(PathBuf, PathBuf)]) -> Result<()> {
        for (old, new) in pairs {
            if Self::is_monitored(old) && Self::is_monitored(new) {
                let old_key = self.file_key(old);
                self.store.clear_file(&old_key);
                self.rebuild_file(new).await?;
            }
        }
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    /// Debounced active-file rebuild: rapid edits coalesce into one reparse
    /// after input quiesces. Must run inside a tokio runtime.
    pub fn schedule_active_rebuild(&mut self, file_key: &str, text: &str) {
        if let Some(pending) = self.pending_active_rebuild.take() {
            pending.abort();
        }
        let active = Arc::clone(&self.active);
        let file_key = file_key.to_string();
        let text = text.to_string();
        self.pending_active_rebuild = Some(tokio::spawn(async move {
            tokio::time::sleep(ACTIVE_FILE_DEBOUNCE).await;
            active.lock().await.rebuild(&file_key, &text);
        }));
    }

    /// Immediate active-file rebuild, bypassing the debounce window.
    pub async fn rebuild_active_now(&self, file_key: &str, text: &str) {
        self.active.lock().await.rebuild(file_key, text);
    }

    // --- query surface ---

    pub fn match_word_at(
        &self,
        line_text: &str,
        line: u32,
        file_key: &str,
        cursor: u32,
    ) -> Option<WordMatch> {
        matching::match_word_at(&self.store, line_text, line, file_key, cursor)
            .filter(|matched| !matched.kind().noop)
    }

    pub fn lookup(&self, name: &str, kind: MatchKindId) -> Option<&Identifier> {
        self.store.identifiers.get(name, kind)
    }

    pub fn lookup_by_key(&self, key: &IdentifierKey) -> Option<&Identifier> {
        self.store.identifiers.get_by_key(key)
    }

    pub fn parent_declaration(
        &self,
        file_key: &str,
        line: u32,
        required: Option<MatchKindId>,
    ) -> Option<&Identifier> {
        self.store.identifiers.parent_declaration(file_key, line, required)
    }

    pub async fn script_at_line(&self, line: u32) -> Option<ScriptBlock> {
        self.active.lock().await.script_at_line(line).cloned()
    }

    /// Deterministic JSON dump of the symbol cache.
    pub fn serialize(&self) -> serde_json::Value {
        self.store.identifiers.serialize()
    }

    /// Sorted cache keys.
    pub fn keys(&self) -> Vec<String> {
        self.store.identifiers.keys()
    }

    // --- rename surface ---

    pub fn prepare_rename(
        &self,
        line_text: &str,
        line: u32,
        file_key: &str,
        cursor: u32,
    ) -> Result<WordMatch, RenameError> {
        rename::prepare(&self.store, line_text, line, file_key, cursor)
    }

    pub async fn plan_rename(
        &self,
        matched: &WordMatch,
        line: u32,
        new_name: &str,
    ) -> Result<Vec<TextEdit>, RenameError> {
        let active = self.active.lock().await;
        rename::plan(&self.store, &active, matched, line, new_name)
    }

    /// File renames implied by renaming a file-named symbol.
    pub fn plan_file_renames(&self, matched: &WordMatch, new_name: &str) -> Vec<(FileKey, String)> {
        let files: Vec<FileKey> = self
            .all_workspace_files()
            .iter()
            .map(|path| self.file_key(path))
            .collect();
        rename::file_renames(matched, new_name, &files)
    }

    fn all_workspace_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&self.root).hidden(false).build().flatten() {
            if entry.file_type().is_some_and(|file_type| file_type.is_file()) {
                files.push(entry.into_path());
            }
        }
        files
    }

    async fn read_files(&self, files: &[PathBuf]) -> Vec<(FileKey, String)> {
        let reads = files.iter().map(|path| async move {
            (path.clone(), tokio::fs::read_to_string(path).await)
        });
        let mut contents = Vec::with_capacity(files.len());
        for (path, result) in join_all(reads).await {
            let file_key = self.file_key(&path);
            match result {
                Ok(text) => contents.push((file_key, text)),
                // Absent from this rebuild cycle, never retried.
                Err(error) => warn!(file = %file_key, %error, "skipping unreadable file"),
            }
        }
        contents
    }
}
