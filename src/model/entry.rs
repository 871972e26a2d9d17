// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};

use super::ids::EntryId;
use crate::conditions::WaveSummary;

/// One surf session in the journal.
///
/// An entry starts life as a draft (no id) built by the create form. The
/// store assigns the id when the entry is persisted; from then on the id is
/// immutable and the entry is addressable on disk as `<id>.json`.
///
/// `created_at` is kept as an RFC 3339 string rather than a parsed timestamp
/// because older journal files may carry values we still want to display and
/// sort by best-effort without rejecting the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: Option<EntryId>,
    spot: String,
    wave_height: String,
    conditions: Option<WaveSummary>,
    session_at: Option<DateTime<Utc>>,
    comments: String,
    created_at: String,
}

impl Entry {
    pub fn new(spot: impl Into<String>) -> Self {
        Self {
            id: None,
            spot: spot.into(),
            wave_height: String::new(),
            conditions: None,
            session_at: None,
            comments: String::new(),
            created_at: String::new(),
        }
    }

    pub fn id(&self) -> Option<&EntryId> {
        self.id.as_ref()
    }

    pub(crate) fn set_id(&mut self, id: Option<EntryId>) {
        self.id = id;
    }

    pub fn spot(&self) -> &str {
        &self.spot
    }

    pub fn wave_height(&self) -> &str {
        &self.wave_height
    }

    pub fn set_wave_height(&mut self, wave_height: impl Into<String>) {
        self.wave_height = wave_height.into();
    }

    /// Conditions snapshot captured at creation time. The store never
    /// recomputes or inspects this; it round-trips through the entry file.
    pub fn conditions(&self) -> Option<&WaveSummary> {
        self.conditions.as_ref()
    }

    pub fn set_conditions(&mut self, conditions: Option<WaveSummary>) {
        self.conditions = conditions;
    }

    pub fn session_at(&self) -> Option<DateTime<Utc>> {
        self.session_at
    }

    pub fn set_session_at(&mut self, session_at: Option<DateTime<Utc>>) {
        self.session_at = session_at;
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = comments.into();
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn set_created_at(&mut self, created_at: impl Into<String>) {
        self.created_at = created_at.into();
    }

    /// The key the journal orders by: session time if present, otherwise the
    /// parsed creation timestamp, otherwise the epoch.
    pub fn sort_key(&self) -> DateTime<Utc> {
        if let Some(session_at) = self.session_at {
            return session_at;
        }
        DateTime::parse_from_rfc3339(self.created_at.trim())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn title(&self) -> &str {
        &self.spot
    }

    pub fn description(&self) -> String {
        match &self.conditions {
            Some(conditions) => format!("{} • {conditions}", self.wave_height),
            None if self.wave_height.is_empty() => self.created_at.clone(),
            None => self.wave_height.clone(),
        }
    }

    /// Lowercased haystack the list filter matches against.
    pub fn search_key(&self) -> String {
        let mut blob = String::new();
        blob.push_str(&self.spot);
        blob.push(' ');
        blob.push_str(&self.wave_height);
        if let Some(conditions) = &self.conditions {
            blob.push(' ');
            blob.push_str(&conditions.to_string());
        }
        blob.push(' ');
        blob.push_str(&self.comments);
        blob.to_lowercase()
    }
}
