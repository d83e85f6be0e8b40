//! Filesystem storage implementation
//!
//! This module provides an output-directory implementation of the
//! DocumentStore trait.

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{FailureList, FailureRecord, IndexEntry, INDEX_FILE};
use crate::url::{reconstruct_url, NormalizedUrl, Scope, Slug};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Output directory storage backend
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens the output directory, creating it if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Path to the output directory
    ///
    /// # Returns
    ///
    /// * `Ok(FsStore)` - Directory exists and is usable
    /// * `Err(StorageError)` - Directory could not be created
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root).map_err(|e| StorageError::io(root, e))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, slug: &Slug) -> PathBuf {
        self.root.join(slug.file_name())
    }

    fn failure_path(&self, list: FailureList) -> PathBuf {
        self.root.join(list.file_name())
    }

    /// Records an entry, replacing any earlier entry for the same URL
    fn upsert_index(&self, entry: IndexEntry) -> StorageResult<()> {
        let mut entries = self.load_index()?;
        entries.retain(|existing| existing.url != entry.url);
        entries.push(entry);

        let mut content = String::new();
        for entry in &entries {
            content.push_str(&serde_json::to_string(entry)?);
            content.push('\n');
        }

        let path = self.root.join(INDEX_FILE);
        fs::write(&path, content).map_err(|e| StorageError::io(&path, e))
    }

    /// Rebuilds URLs from the `.md` file names in the output directory
    fn urls_from_file_names(&self, scope: &Scope) -> StorageResult<HashSet<NormalizedUrl>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&self.root, e))?;
        let mut urls = HashSet::new();

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match reconstruct_url(scope.root(), &Slug::new(stem)) {
                Ok(url) => {
                    urls.insert(url);
                }
                Err(e) => tracing::debug!("Ignoring {}: {}", path.display(), e),
            }
        }

        Ok(urls)
    }
}

impl DocumentStore for FsStore {
    // ===== Documents =====

    fn exists(&self, slug: &Slug) -> bool {
        self.document_path(slug).is_file()
    }

    fn write_document(
        &mut self,
        url: &NormalizedUrl,
        slug: &Slug,
        text: &str,
    ) -> StorageResult<()> {
        let path = self.document_path(slug);
        fs::write(&path, format!("{}\n", text)).map_err(|e| StorageError::io(&path, e))?;

        self.upsert_index(IndexEntry {
            url: url.clone(),
            slug: slug.clone(),
            scraped_at: Utc::now(),
        })
    }

    // ===== URL Index =====

    fn load_index(&self) -> StorageResult<Vec<IndexEntry>> {
        let path = self.root.join(INDEX_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        let mut entries = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: IndexEntry =
                serde_json::from_str(line).map_err(|e| StorageError::MalformedIndex {
                    line: number + 1,
                    message: e.to_string(),
                })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    fn scraped_urls(&self, scope: &Scope) -> StorageResult<HashSet<NormalizedUrl>> {
        if !self.root.join(INDEX_FILE).is_file() {
            return self.urls_from_file_names(scope);
        }

        // Documents deleted by hand are scraped again
        Ok(self
            .load_index()?
            .into_iter()
            .filter(|entry| self.exists(&entry.slug))
            .map(|entry| entry.url)
            .collect())
    }

    // ===== Failure Lists =====

    fn read_failures(&self, list: FailureList) -> StorageResult<Vec<String>> {
        let path = self.failure_path(list);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    fn write_failures(
        &mut self,
        list: FailureList,
        failures: &[FailureRecord],
    ) -> StorageResult<()> {
        let path = self.failure_path(list);
        let content: String = failures
            .iter()
            .map(|failure| format!("{}\n", failure.url))
            .collect();
        fs::write(&path, content).map_err(|e| StorageError::io(&path, e))
    }

    fn clear_failures(&mut self, list: FailureList) -> StorageResult<()> {
        let path = self.failure_path(list);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }
}
