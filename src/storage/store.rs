//! Token-addressed document store
//!
//! Each document is one `{token}.json` file directly under the store
//! root, a flat keyspace. Every operation re-reads the disk; there is no
//! cache, no locking, and no coordination between writers. The design
//! assumes a single active writer; racing writers are last-write-wins.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::warn;

use crate::domain::{self, Document};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller passed something that is not a token. A contract
    /// violation, not a runtime condition: fix the caller, don't retry.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// A flat, token-addressed document store rooted at one directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens a store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create store root: {}", root.display()))?;
        Ok(Self { root })
    }

    /// Returns the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Writes `document` under `id`, replacing any previous version.
    ///
    /// The write goes through a temp file and an atomic rename, so a
    /// concurrent reader never observes a half-written document.
    pub fn put(&self, id: &str, document: &Document) -> Result<()> {
        if !domain::is_valid(id) {
            return Err(StoreError::InvalidIdentifier(id.to_string()).into());
        }

        let path = self.doc_path(id);
        let temp = path.with_extension("json.tmp");
        {
            let file = File::create(&temp)
                .with_context(|| format!("failed to create temp file: {}", temp.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, document)
                .context("failed to serialize document")?;
            writer.flush().context("failed to flush document")?;
        }

        fs::rename(&temp, &path).with_context(|| {
            format!("failed to rename {} to {}", temp.display(), path.display())
        })?;

        Ok(())
    }

    /// Reads the document at `id`.
    ///
    /// `Ok(None)` means nothing is stored there, which is a normal
    /// outcome, distinct from the malformed-identifier error.
    pub fn get(&self, id: &str) -> Result<Option<Document>> {
        if !domain::is_valid(id) {
            return Err(StoreError::InvalidIdentifier(id.to_string()).into());
        }

        let path = self.doc_path(id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to open document: {}", path.display()))
            }
        };

        let document = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse document: {}", path.display()))?;
        Ok(Some(document))
    }

    /// Enumerates the `(id, document)` pairs whose token prefix equals
    /// `doc_type`, filtered by `query` when one is given.
    ///
    /// Lazily evaluated against the on-disk state at iteration time, in
    /// unspecified order; calling again restarts from the current state.
    /// Files that are not tokens of `doc_type`, and documents deleted
    /// between the directory scan and the read, are skipped.
    pub fn list<'a>(
        &'a self,
        doc_type: &'a str,
        query: Option<&'a Document>,
    ) -> Result<List<'a>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read store root: {}", self.root.display())
                })
            }
        };
        Ok(List {
            store: self,
            doc_type,
            query,
            entries,
        })
    }

    /// Resolves the most recently issued match for `doc_type`.
    ///
    /// The winner has the greatest timestamp embedded in its identifier;
    /// ties break on the full identifier string, so repeated calls
    /// against unchanged data are stable.
    pub fn latest(
        &self,
        doc_type: &str,
        query: Option<&Document>,
    ) -> Result<Option<(String, Document)>> {
        let mut best: Option<(i64, String, Document)> = None;
        for item in self.list(doc_type, query)? {
            let (id, document) = item?;
            let timestamp = domain::parse(&id).map_or(0, |p| p.timestamp);
            let newer = match &best {
                Some((ts, best_id, _)) => (timestamp, id.as_str()) > (*ts, best_id.as_str()),
                None => true,
            };
            if newer {
                best = Some((timestamp, id, document));
            }
        }
        Ok(best.map(|(_, id, document)| (id, document)))
    }

    /// Selects documents of `doc_type` for removal under a retention
    /// policy, returning them oldest-first.
    ///
    /// With `retention_count`, everything older than the most recent
    /// `count` documents is selected (a count of zero behaves as one).
    /// Independently, anything older than `retention_window` is selected.
    /// The union is always returned; unless `dry_run` is set, each
    /// candidate is then deleted, with individual failures logged and
    /// skipped. The return value reflects selection, not confirmed
    /// deletion.
    pub fn cleanup(
        &self,
        doc_type: &str,
        retention_count: Option<usize>,
        retention_window: Option<Duration>,
        dry_run: bool,
    ) -> Result<Vec<(String, Document)>> {
        let mut entries = Vec::new();
        for item in self.list(doc_type, None)? {
            let (id, document) = item?;
            let timestamp = domain::parse(&id).map_or(0, |p| p.timestamp);
            entries.push((timestamp, id, document));
        }
        entries.sort_by(|(ts_a, id_a, _), (ts_b, id_b, _)| (ts_a, id_a).cmp(&(ts_b, id_b)));

        let now = Utc::now();
        let cutoff = retention_count.map(|count| entries.len().saturating_sub(count.max(1)));

        let mut selected = Vec::new();
        for (index, (timestamp, id, document)) in entries.into_iter().enumerate() {
            let beyond_count = cutoff.map_or(false, |cutoff| index < cutoff);
            let expired = match (retention_window, DateTime::from_timestamp(timestamp, 0)) {
                (Some(window), Some(issued)) => now.signed_duration_since(issued) > window,
                _ => false,
            };
            if beyond_count || expired {
                selected.push((id, document));
            }
        }

        if !dry_run {
            for (id, _) in &selected {
                let path = self.doc_path(id);
                if let Err(error) = fs::remove_file(&path) {
                    warn!(id = %id, error = %error, "failed to delete document; skipping");
                }
            }
        }

        Ok(selected)
    }
}

/// Lazy iterator over the documents of one type.
pub struct List<'a> {
    store: &'a Store,
    doc_type: &'a str,
    query: Option<&'a Document>,
    entries: Option<fs::ReadDir>,
}

impl Iterator for List<'_> {
    type Item = Result<(String, Document)>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;
        loop {
            let entry = match entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e).context("failed to read store entry")),
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id) = name.strip_suffix(".json") else { continue };
            let Some(parsed) = domain::parse(id) else { continue };
            if parsed.prefix != self.doc_type {
                continue;
            }
            match self.store.get(id) {
                // Deleted between the directory scan and the read.
                Ok(None) => continue,
                Ok(Some(document)) => {
                    if self.query.map_or(true, |q| domain::matches(&document, q)) {
                        return Some(Ok((id.to_string(), document)));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
