// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Entry;

/// Perceived wave height buckets, smallest to largest.
pub(crate) const HEIGHT_OPTIONS: [&str; 7] = [
    "Ankle", "Knee", "Waist", "Chest", "Shoulder", "Head", "Overhead",
];

const DEFAULT_SESSION_HOUR: u32 = 7;
const DEFAULT_SESSION_MINUTE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormStep {
    Spot,
    SessionTime,
    WaveHeight,
    Comments,
    Confirm,
}

#[derive(Debug)]
pub(crate) enum FormOutcome {
    Pending,
    Submitted(Entry),
    Discarded,
}

/// Linear new-entry wizard: one field per step, Enter advances, Esc steps
/// back (and discards from the first step or the confirm step).
#[derive(Debug, Clone)]
pub(crate) struct EntryForm {
    pub(crate) step: FormStep,
    pub(crate) spot: String,
    pub(crate) session_time: String,
    pub(crate) height_index: usize,
    pub(crate) comments: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            step: FormStep::Spot,
            spot: String::new(),
            session_time: String::new(),
            height_index: 0,
            comments: String::new(),
        }
    }
}

impl EntryForm {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn height(&self) -> &'static str {
        HEIGHT_OPTIONS[self.height_index % HEIGHT_OPTIONS.len()]
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, utc_offset: FixedOffset) -> FormOutcome {
        match self.step {
            FormStep::Spot => match key.code {
                KeyCode::Char(ch) => {
                    self.spot.push(ch);
                    FormOutcome::Pending
                }
                KeyCode::Backspace => {
                    self.spot.pop();
                    FormOutcome::Pending
                }
                KeyCode::Enter => {
                    // Spot is the one required field; stay put until it has content.
                    if !self.spot.trim().is_empty() {
                        self.step = FormStep::SessionTime;
                    }
                    FormOutcome::Pending
                }
                KeyCode::Esc => {
                    self.reset();
                    FormOutcome::Discarded
                }
                _ => FormOutcome::Pending,
            },
            FormStep::SessionTime => match key.code {
                KeyCode::Char(ch) => {
                    self.session_time.push(ch);
                    FormOutcome::Pending
                }
                KeyCode::Backspace => {
                    self.session_time.pop();
                    FormOutcome::Pending
                }
                KeyCode::Enter => {
                    self.step = FormStep::WaveHeight;
                    FormOutcome::Pending
                }
                KeyCode::Esc => {
                    self.step = FormStep::Spot;
                    FormOutcome::Pending
                }
                _ => FormOutcome::Pending,
            },
            FormStep::WaveHeight => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.height_index =
                        (self.height_index + HEIGHT_OPTIONS.len() - 1) % HEIGHT_OPTIONS.len();
                    FormOutcome::Pending
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.height_index = (self.height_index + 1) % HEIGHT_OPTIONS.len();
                    FormOutcome::Pending
                }
                KeyCode::Enter => {
                    self.step = FormStep::Comments;
                    FormOutcome::Pending
                }
                KeyCode::Esc => {
                    self.step = FormStep::SessionTime;
                    FormOutcome::Pending
                }
                _ => FormOutcome::Pending,
            },
            FormStep::Comments => match key.code {
                KeyCode::Char(ch) => {
                    self.comments.push(ch);
                    FormOutcome::Pending
                }
                KeyCode::Backspace => {
                    self.comments.pop();
                    FormOutcome::Pending
                }
                KeyCode::Enter => {
                    self.step = FormStep::Confirm;
                    FormOutcome::Pending
                }
                KeyCode::Esc => {
                    self.step = FormStep::WaveHeight;
                    FormOutcome::Pending
                }
                _ => FormOutcome::Pending,
            },
            FormStep::Confirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    let entry = self.build_entry(utc_offset);
                    self.reset();
                    FormOutcome::Submitted(entry)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.reset();
                    FormOutcome::Discarded
                }
                _ => FormOutcome::Pending,
            },
        }
    }

    fn build_entry(&self, utc_offset: FixedOffset) -> Entry {
        let mut entry = Entry::new(self.spot.trim());
        entry.set_wave_height(self.height());
        entry.set_session_at(Some(parse_session_time(&self.session_time, utc_offset)));
        entry.set_comments(self.comments.trim());
        entry
    }
}

/// Resolves the session-time field to an instant.
///
/// Accepts `YYYY-MM-DD HH:MM`, or bare `HH:MM` resolved against today's
/// local date. Anything else falls back to today 07:30 local.
pub(crate) fn parse_session_time(raw: &str, utc_offset: FixedOffset) -> DateTime<Utc> {
    let today = Utc::now().with_timezone(&utc_offset).date_naive();
    let default_time = NaiveTime::from_hms_opt(DEFAULT_SESSION_HOUR, DEFAULT_SESSION_MINUTE, 0)
        .unwrap_or(NaiveTime::MIN);

    let raw = raw.trim();
    let local = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveTime::parse_from_str(raw, "%H:%M")
                .ok()
                .map(|time| today.and_time(time))
        })
        .unwrap_or_else(|| today.and_time(default_time));

    // A fixed offset has no DST gaps, so the conversion is unambiguous.
    match utc_offset.from_local_datetime(&local).single() {
        Some(resolved) => resolved.with_timezone(&Utc),
        None => Utc::now(),
    }
}
