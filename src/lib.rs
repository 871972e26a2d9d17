// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Surflog — a terminal surf journal with NOAA tide and wave conditions.
//!
//! One JSON file per journal entry, an interactive ratatui shell, and a
//! background fetch of buoy and tide data for the home break.

pub mod conditions;
pub mod model;
pub mod store;
pub mod tui;
