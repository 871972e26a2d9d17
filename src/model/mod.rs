// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Domain model: journal entries, ids, and the ordered in-memory journal.

pub mod entry;
pub mod ids;
pub mod journal;

pub use entry::Entry;
pub use ids::{EntryId, Id, IdError};
pub use journal::Journal;
