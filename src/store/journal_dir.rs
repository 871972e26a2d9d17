// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conditions::WaveSummary;
use crate::model::{Entry, EntryId};

#[derive(Debug)]
pub enum StoreError {
    /// No entry file exists for the requested id.
    NotFound { id: EntryId },
    /// An entry file exists but its contents cannot be interpreted.
    Corrupt { path: PathBuf, reason: String },
    /// The entry handed to `create` or produced by `update` is not storable.
    InvalidEntry { reason: &'static str },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The store itself could not be opened (e.g. an empty directory path).
    Unavailable { reason: &'static str },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "no journal entry with id {id}"),
            Self::Corrupt { path, reason } => {
                write!(f, "corrupt journal entry at {path:?}: {reason}")
            }
            Self::InvalidEntry { reason } => write!(f, "invalid journal entry: {reason}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Unavailable { reason } => write!(f, "journal store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::NotFound { .. }
            | Self::Corrupt { .. }
            | Self::InvalidEntry { .. }
            | Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// The outcome of a [`JournalDir::list`] pass.
///
/// `skipped` counts files that look like entry files but could not be loaded
/// (unreadable, unparsable, or missing an id). Skipping them is not an error;
/// the caller decides whether to surface the count.
#[derive(Debug, Default)]
pub struct ListOutcome {
    pub entries: Vec<Entry>,
    pub skipped: usize,
}

/// A journal directory holding one `<id>.json` file per entry.
///
/// Single-process by design: no locks, no cross-file transactions. Every write
/// goes through a temp file plus atomic rename so readers never observe a
/// half-written entry.
#[derive(Debug, Clone)]
pub struct JournalDir {
    root: PathBuf,
    durability: WriteDurability,
}

impl JournalDir {
    /// Opens (creating if needed) the journal directory at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(StoreError::Unavailable {
                reason: "journal directory path is empty",
            });
        }
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            durability: WriteDurability::default(),
        })
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, id: &EntryId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Loads every readable entry in the directory.
    ///
    /// Files that cannot be read or parsed, or that carry no id, are skipped
    /// and counted rather than failing the whole pass. One bad file must not
    /// hide the rest of the journal. A missing `created_at` is backfilled
    /// from the file's modification time, in memory only.
    pub fn list(&self) -> Result<ListOutcome, StoreError> {
        let dir_entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut outcome = ListOutcome::default();
        for dir_entry in dir_entries.filter_map(|entry| entry.ok()) {
            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'))
            {
                continue;
            }

            match self.load_entry_file(&path) {
                Ok(entry) => outcome.entries.push(entry),
                Err(_) => outcome.skipped += 1,
            }
        }

        Ok(outcome)
    }

    pub fn get(&self, id: &EntryId) -> Result<Entry, StoreError> {
        let path = self.entry_path(id);
        match self.load_entry_file(&path) {
            Ok(entry) => Ok(entry),
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { id: id.clone() })
            }
            Err(err) => Err(err),
        }
    }

    /// Persists a draft entry, allocating its identity.
    ///
    /// Any id already on the draft is discarded; only `create` mints ids.
    pub fn create(&self, mut entry: Entry) -> Result<Entry, StoreError> {
        if entry.spot().trim().is_empty() {
            return Err(StoreError::InvalidEntry {
                reason: "spot is required",
            });
        }

        let id = EntryId::new(Uuid::new_v4().to_string())
            .map_err(|_| StoreError::InvalidEntry {
                reason: "generated id is not a valid file stem",
            })?;
        entry.set_id(Some(id));

        if entry.created_at().trim().is_empty() {
            entry.set_created_at(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        self.write_entry(&entry)?;
        Ok(entry)
    }

    /// Loads the entry, applies `mutate`, and writes the result back.
    ///
    /// The id is re-pinned after `mutate` runs, so a callback cannot re-home
    /// the entry to a different file. If `mutate` fails, nothing is written.
    pub fn update(
        &self,
        id: &EntryId,
        mutate: impl FnOnce(&mut Entry) -> Result<(), StoreError>,
    ) -> Result<Entry, StoreError> {
        let mut entry = self.get(id)?;
        mutate(&mut entry)?;
        entry.set_id(Some(id.clone()));

        if entry.spot().trim().is_empty() {
            return Err(StoreError::InvalidEntry {
                reason: "spot is required",
            });
        }
        if entry.created_at().trim().is_empty() {
            entry.set_created_at(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        self.write_entry(&entry)?;
        Ok(entry)
    }

    /// Removes the entry file. A file that is already gone is success.
    pub fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        let path = self.entry_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn load_entry_file(&self, path: &Path) -> Result<Entry, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // A file that exists but does not deserialize is a corrupt entry,
        // not a json-layer failure; `Json` is reserved for the write path.
        let json: EntryJson = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("not a valid entry: {source}"),
        })?;

        let mut entry = entry_from_json(json, path)?;

        if entry.created_at().trim().is_empty() {
            if let Some(mtime) = file_mtime_rfc3339(path) {
                entry.set_created_at(mtime);
            }
        }

        Ok(entry)
    }

    fn write_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let Some(id) = entry.id() else {
            return Err(StoreError::InvalidEntry {
                reason: "entry has no id",
            });
        };
        let path = self.entry_path(id);

        let json = entry_to_json(entry);
        let raw = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        write_atomic(&path, format!("{raw}\n").as_bytes(), self.durability)
    }
}

// Extracted persistence helpers for `JournalDir`.
include!("journal_dir/helpers.rs");
