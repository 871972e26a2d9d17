// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entry::Entry;
use super::ids::EntryId;

/// The in-memory, ordered view of all journal entries.
///
/// Ordering is maintained by a full stable re-sort after every structural
/// change: descending by [`Entry::sort_key`], with entries that compare equal
/// keeping their insertion order. The journal never touches disk; callers
/// mirror store mutations into it explicitly.
#[derive(Debug, Default, Clone)]
pub struct Journal {
    entries: Vec<Entry>,
}

impl Journal {
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut journal = Self { entries };
        journal.reorder();
        journal
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.reorder();
    }

    /// Removes the entry with the given id, if present. The remaining
    /// entries keep their relative order, so no re-sort is needed.
    pub fn remove_by_id(&mut self, id: &EntryId) -> Option<Entry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id() == Some(id))?;
        Some(self.entries.remove(index))
    }

    pub fn position_of(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == Some(id))
    }

    fn reorder(&mut self) {
        // Stable sort: equal keys preserve insertion order.
        self.entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
    }
}
