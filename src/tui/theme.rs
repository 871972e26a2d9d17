// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Color, Modifier, Style};

// Ocean palette, xterm-256 indexed.
// Deep Blue: 24, Cyan accents: 44/51, Light Foam: 159, Soft Grey: 243-246, Coral: 203
const DEEP_BLUE: Color = Color::Indexed(24);
const CYAN_ACCENT: Color = Color::Indexed(44);
const BRIGHT_CYAN: Color = Color::Indexed(51);
const FOAM: Color = Color::Indexed(159);
const SOFT_GREY: Color = Color::Indexed(245);
const FOOTER_GREY: Color = Color::Indexed(243);
const META_GREY: Color = Color::Indexed(244);
const CORAL: Color = Color::Indexed(203);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(BRIGHT_CYAN)
        .bg(DEEP_BLUE)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn tab_style() -> Style {
    Style::default().fg(SOFT_GREY)
}

pub(crate) fn active_tab_style() -> Style {
    Style::default()
        .fg(FOAM)
        .bg(DEEP_BLUE)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn pane_title_style() -> Style {
    Style::default().fg(CYAN_ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(DEEP_BLUE)
}

pub(crate) fn entry_title_style() -> Style {
    Style::default().fg(FOAM).add_modifier(Modifier::BOLD)
}

pub(crate) fn entry_meta_style() -> Style {
    Style::default().fg(META_GREY)
}

pub(crate) fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

pub(crate) fn footer_style() -> Style {
    Style::default().fg(FOOTER_GREY)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(SOFT_GREY)
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(CORAL)
}

pub(crate) fn prompt_style() -> Style {
    Style::default().fg(BRIGHT_CYAN)
}
