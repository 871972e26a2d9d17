// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence: one JSON file per journal entry under the journal directory.

pub mod journal_dir;

pub use journal_dir::{JournalDir, ListOutcome, StoreError, WriteDurability};
