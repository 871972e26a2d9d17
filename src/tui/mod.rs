// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive surf journal shell (ratatui + crossterm): a left
//! conditions pane next to the journal list/detail view and the new-entry
//! wizard, driven by a single-threaded 250 ms event loop.

use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::FixedOffset;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::conditions::{
    ConditionsFetcher, ConditionsUpdate, FetchError, TideData, WaveSummary, TIDE_STATION_ID,
    WAVE_STATION_ID,
};
use crate::model::{Entry, EntryId, Journal};
use crate::store::{JournalDir, ListOutcome, WriteDurability};

mod form;
mod theme;

use form::{EntryForm, FormOutcome, FormStep};

const MIN_CONDITIONS_WIDTH: u16 = 24;
const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Everything the TUI needs from the outside world, passed in explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub journal_dir: PathBuf,
    pub utc_offset: FixedOffset,
    pub durability: WriteDurability,
    pub offline: bool,
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let store = JournalDir::new(&config.journal_dir)?.with_durability(config.durability);
    let loaded = store.list()?;

    let fetcher = if config.offline {
        ConditionsFetcher::idle()
    } else {
        ConditionsFetcher::spawn()
    };

    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(store, loaded, config.utc_offset);

    while !app.should_quit {
        app.poll_conditions(&fetcher);
        app.expire_toast();
        app.ensure_valid_mode();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Journal,
    Create,
}

/// The journal pane's interaction mode. A pending delete carries its target
/// id so the confirmation cannot drift onto a different entry when the list
/// shifts underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum JournalMode {
    List,
    Detail,
    ConfirmDelete { target: EntryId },
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    store: JournalDir,
    journal: Journal,
    pane: Pane,
    mode: JournalMode,
    filter: String,
    filter_editing: bool,
    list_state: ListState,
    visible_indices: Vec<usize>,
    form: EntryForm,
    tide: Option<Result<TideData, FetchError>>,
    waves: Option<Result<WaveSummary, FetchError>>,
    utc_offset: FixedOffset,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(store: JournalDir, loaded: ListOutcome, utc_offset: FixedOffset) -> Self {
        let journal = Journal::from_entries(loaded.entries);

        let mut list_state = ListState::default();
        if !journal.is_empty() {
            list_state.select(Some(0));
        }
        let visible_indices: Vec<usize> = (0..journal.len()).collect();

        let mut app = Self {
            store,
            journal,
            pane: Pane::Journal,
            mode: JournalMode::List,
            filter: String::new(),
            filter_editing: false,
            list_state,
            visible_indices,
            form: EntryForm::default(),
            tide: None,
            waves: None,
            utc_offset,
            toast: None,
            should_quit: false,
        };

        if loaded.skipped > 0 {
            app.set_toast(format!(
                "Skipped {} unreadable entry file(s)",
                loaded.skipped
            ));
        }

        app
    }

    fn poll_conditions(&mut self, fetcher: &ConditionsFetcher) {
        while let Some(update) = fetcher.try_recv() {
            match update {
                ConditionsUpdate::Tide(result) => self.tide = Some(result),
                ConditionsUpdate::Waves(result) => self.waves = Some(result),
            }
        }
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| Instant::now() >= toast.expires_at)
        {
            self.toast = None;
        }
    }

    /// Falls back to the list when the mode refers to an entry that is no
    /// longer there, instead of rendering a stale selection.
    fn ensure_valid_mode(&mut self) {
        match &self.mode {
            JournalMode::Detail if self.selected_entry().is_none() => {
                self.mode = JournalMode::List;
            }
            JournalMode::ConfirmDelete { target } if self.journal.position_of(target).is_none() => {
                self.mode = JournalMode::List;
            }
            _ => {}
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.pane {
            Pane::Create => self.handle_create_key(key),
            Pane::Journal => {
                if self.filter_editing {
                    self.handle_filter_key(key);
                } else {
                    self.handle_journal_key(key);
                }
            }
        }
    }

    fn handle_create_key(&mut self, key: KeyEvent) {
        match self.form.handle_key(key, self.utc_offset) {
            FormOutcome::Pending => {}
            FormOutcome::Discarded => {
                self.pane = Pane::Journal;
            }
            FormOutcome::Submitted(draft) => self.submit_entry(draft),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) => {
                self.filter.push(ch);
                self.refresh_visible();
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.refresh_visible();
            }
            KeyCode::Enter => {
                self.filter_editing = false;
            }
            KeyCode::Esc => {
                self.filter.clear();
                self.filter_editing = false;
                self.refresh_visible();
            }
            _ => {}
        }
    }

    fn handle_journal_key(&mut self, key: KeyEvent) {
        match self.mode.clone() {
            JournalMode::List => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('c') => {
                    self.form.reset();
                    self.pane = Pane::Create;
                }
                KeyCode::Char('/') => self.filter_editing = true,
                KeyCode::Esc => {
                    if !self.filter.is_empty() {
                        self.filter.clear();
                        self.refresh_visible();
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
                KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
                KeyCode::Enter => {
                    if self.selected_entry().is_some() {
                        self.mode = JournalMode::Detail;
                    }
                }
                KeyCode::Char('d') => {
                    let target = self
                        .selected_entry()
                        .and_then(|entry| entry.id().cloned());
                    if let Some(target) = target {
                        self.mode = JournalMode::ConfirmDelete { target };
                    }
                }
                _ => {}
            },
            JournalMode::Detail => match key.code {
                KeyCode::Esc | KeyCode::Backspace => self.mode = JournalMode::List,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            JournalMode::ConfirmDelete { target } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.delete_confirmed(&target);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('d') => {
                    self.mode = JournalMode::List;
                }
                _ => {}
            },
        }
    }

    /// Applies a confirmed delete.
    ///
    /// The on-screen journal must not keep showing an entry the user just
    /// confirmed deleting, so the in-memory removal happens even when the
    /// file removal fails; the failure is surfaced as a toast.
    fn delete_confirmed(&mut self, target: &EntryId) {
        match self.store.delete(target) {
            Ok(()) => self.set_toast("Entry deleted"),
            Err(err) => self.set_toast(format!("Delete failed: {err}")),
        }

        self.journal.remove_by_id(target);
        self.refresh_visible();
        self.mode = JournalMode::List;
    }

    fn submit_entry(&mut self, mut draft: Entry) {
        if let Some(Ok(waves)) = &self.waves {
            draft.set_conditions(Some(waves.clone()));
        }

        match self.store.create(draft) {
            Ok(entry) => {
                let id = entry.id().cloned();
                self.journal.insert(entry);
                self.refresh_visible();
                if let Some(id) = id {
                    self.select_entry(&id);
                }
                self.pane = Pane::Journal;
                self.mode = JournalMode::List;
                self.set_toast("Entry saved");
            }
            Err(err) => {
                self.set_toast(format!("Save failed: {err}"));
            }
        }
    }

    fn refresh_visible(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible_indices = self
            .journal
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| needle.is_empty() || entry.search_key().contains(&needle))
            .map(|(index, _)| index)
            .collect();

        let selected = match self.list_state.selected() {
            _ if self.visible_indices.is_empty() => None,
            Some(selected) => Some(selected.min(self.visible_indices.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible_indices.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let last = self.visible_indices.len() as isize - 1;
        let next = (current + delta).clamp(0, last);
        self.list_state.select(Some(next as usize));
    }

    fn select_entry(&mut self, id: &EntryId) {
        let position = self
            .journal
            .position_of(id)
            .and_then(|index| self.visible_indices.iter().position(|&v| v == index));
        if let Some(position) = position {
            self.list_state.select(Some(position));
        }
    }

    fn selected_entry(&self) -> Option<&Entry> {
        let visible_pos = self.list_state.selected()?;
        let index = *self.visible_indices.get(visible_pos)?;
        self.journal.get(index)
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, app, rows[0]);

    // 30% left column with a floor so the conditions stay readable.
    let left_width = MIN_CONDITIONS_WIDTH.max(rows[1].width * 3 / 10);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_width), Constraint::Min(20)])
        .split(rows[1]);

    draw_conditions(frame, app, columns[0]);

    match app.pane {
        Pane::Journal => {
            match app.mode {
                JournalMode::Detail => draw_detail(frame, app, columns[1]),
                JournalMode::List | JournalMode::ConfirmDelete { .. } => {
                    draw_journal_list(frame, app, columns[1]);
                }
            }
            if let JournalMode::ConfirmDelete { .. } = app.mode {
                draw_confirm_delete(frame, app, columns[1]);
            }
        }
        Pane::Create => draw_form(frame, app, columns[1]),
    }

    draw_footer(frame, app, rows[2]);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" surflog ", theme::header_style()),
        Span::raw(" "),
    ];
    for (pane, label) in [(Pane::Journal, " journal "), (Pane::Create, " create ")] {
        let style = if app.pane == pane {
            theme::active_tab_style()
        } else {
            theme::tab_style()
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_conditions(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines: Vec<Line<'_>> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("Buoy {WAVE_STATION_ID}"),
        theme::pane_title_style(),
    )));
    match &app.waves {
        None => lines.push(Line::from(Span::styled("fetching waves…", theme::dim_style()))),
        Some(Err(err)) => {
            lines.push(Line::from(Span::styled(
                format!("waves unavailable: {err}"),
                theme::error_style(),
            )));
        }
        Some(Ok(waves)) => {
            lines.push(Line::from(format!(
                "sig {:.1}m  avg {:.1}s",
                waves.significant_height_m, waves.average_period_s
            )));
            lines.push(Line::from(format!(
                "swell {:.1}m @ {:.0}s {}",
                waves.swell_height_m, waves.swell_period_s, waves.swell_direction
            )));
            lines.push(Line::from(format!(
                "wind {:.1}m @ {:.0}s {}",
                waves.wind_wave_height_m, waves.wind_wave_period_s, waves.wind_wave_direction
            )));
            lines.push(Line::from(format!(
                "mean {:.0}°  {}",
                waves.mean_wave_direction_deg, waves.steepness
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Tide {TIDE_STATION_ID}"),
        theme::pane_title_style(),
    )));
    match &app.tide {
        None => lines.push(Line::from(Span::styled("fetching tide…", theme::dim_style()))),
        Some(Err(err)) => {
            lines.push(Line::from(Span::styled(
                format!("tide unavailable: {err}"),
                theme::error_style(),
            )));
        }
        Some(Ok(tide)) => {
            match (tide.low(), tide.high()) {
                (Some(low), Some(high)) => {
                    lines.push(Line::from(format!("low  {:.1}ft  {}", low.height_ft, low.time)));
                    lines.push(Line::from(format!("high {:.1}ft  {}", high.height_ft, high.time)));
                }
                _ => lines.push(Line::from(Span::styled("no predictions today", theme::dim_style()))),
            }
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" Conditions ", theme::pane_title_style()));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_journal_list(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let title = if app.filter.is_empty() {
        " Journal ".to_owned()
    } else {
        format!(" Journal (filter: {}) ", app.filter)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(title, theme::pane_title_style()));

    if app.visible_indices.is_empty() {
        let message = if app.journal.is_empty() {
            "No entries yet. Press 'c' to create one."
        } else {
            "No entries match the filter."
        };
        let paragraph = Paragraph::new(Span::styled(message, theme::dim_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem<'_>> = app
        .visible_indices
        .iter()
        .filter_map(|&index| app.journal.get(index))
        .map(|entry| {
            ListItem::new(vec![
                Line::from(Span::styled(entry.title().to_owned(), theme::entry_title_style())),
                Line::from(Span::styled(entry.description(), theme::entry_meta_style())),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selection_style());
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(entry) = app.selected_entry() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(entry.spot().to_owned(), theme::entry_title_style())),
        Line::from(""),
        Line::from(format!("Wave height: {}", entry.wave_height())),
    ];
    if let Some(session_at) = entry.session_at() {
        let local = session_at.with_timezone(&app.utc_offset);
        lines.push(Line::from(format!("Session:     {}", local.format("%Y-%m-%d %H:%M"))));
    }
    lines.push(Line::from(format!("Logged:      {}", entry.created_at())));
    if let Some(conditions) = entry.conditions() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Conditions", theme::pane_title_style())));
        lines.push(Line::from(conditions.to_string()));
    }
    if !entry.comments().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(entry.comments().to_owned()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" Entry ", theme::pane_title_style()));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn draw_confirm_delete(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let JournalMode::ConfirmDelete { target } = &app.mode else {
        return;
    };

    let spot = app
        .journal
        .position_of(target)
        .and_then(|index| app.journal.get(index))
        .map(|entry| entry.spot().to_owned())
        .unwrap_or_else(|| target.to_string());

    let width = area.width.saturating_sub(8).min(46).max(20).min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(5) / 2,
        width,
        height: 5.min(area.height),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::error_style())
        .title(Span::styled(" Delete entry? ", theme::error_style()));
    let lines = vec![
        Line::from(Span::styled(spot, theme::entry_title_style())),
        Line::from(""),
        Line::from(Span::styled("y/Enter delete   n/Esc keep", theme::footer_style())),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), popup);
}

fn draw_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.form;
    let field = |step: FormStep, label: &str, value: String| -> Line<'static> {
        let marker = if form.step == step { "> " } else { "  " };
        let label_style = if form.step == step {
            theme::prompt_style()
        } else {
            theme::dim_style()
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<14}"), label_style),
            Span::raw(value),
        ])
    };

    let session_hint = if form.session_time.is_empty() {
        "(YYYY-MM-DD HH:MM, default today 07:30)".to_owned()
    } else {
        form.session_time.clone()
    };

    let mut lines = vec![
        field(FormStep::Spot, "Spot", form.spot.clone()),
        field(FormStep::SessionTime, "Session time", session_hint),
        field(FormStep::WaveHeight, "Wave height", form.height().to_owned()),
        field(FormStep::Comments, "Comments", form.comments.clone()),
        Line::from(""),
    ];

    match form.step {
        FormStep::Confirm => {
            lines.push(Line::from(Span::styled(
                "Save this entry? y/Enter save, n/Esc discard",
                theme::prompt_style(),
            )));
        }
        FormStep::WaveHeight => {
            lines.push(Line::from(Span::styled(
                "Up/Down to change, Enter to continue",
                theme::footer_style(),
            )));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "Enter to continue, Esc to go back",
                theme::footer_style(),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" New entry ", theme::pane_title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let text = if let Some(toast) = &app.toast {
        toast.message.clone()
    } else if app.filter_editing {
        format!("/{}  Enter apply  Esc clear", app.filter)
    } else {
        match (&app.pane, &app.mode) {
            (Pane::Create, _) => "Enter next  Esc back".to_owned(),
            (Pane::Journal, JournalMode::List) => {
                "j/k move  Enter open  d delete  / filter  c create  q quit".to_owned()
            }
            (Pane::Journal, JournalMode::Detail) => "Esc back  q quit".to_owned(),
            (Pane::Journal, JournalMode::ConfirmDelete { .. }) => {
                "y/Enter delete  n/Esc keep".to_owned()
            }
        }
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {text}"), theme::footer_style())),
        area,
    );
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
