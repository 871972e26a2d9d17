// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::FixedOffset;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rstest::{fixture, rstest};

use super::{App, JournalMode, Pane};
use crate::model::Entry;
use crate::store::JournalDir;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("surflog-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct AppTestCtx {
    tmp: TempDir,
    store: JournalDir,
}

impl AppTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let store = JournalDir::new(tmp.path().join("journal")).unwrap();
        Self { tmp, store }
    }

    fn seed(&self, spot: &str, comments: &str) -> Entry {
        let mut entry = Entry::new(spot);
        entry.set_wave_height("Waist");
        entry.set_comments(comments);
        self.store.create(entry).unwrap()
    }

    fn app(&self) -> App {
        let loaded = self.store.list().unwrap();
        App::new(self.store.clone(), loaded, FixedOffset::east_opt(0).unwrap())
    }
}

#[fixture]
fn ctx() -> AppTestCtx {
    AppTestCtx::new("tui")
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::from(code));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[rstest]
fn enter_opens_detail_and_esc_returns(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();
    assert_eq!(app.mode, JournalMode::List);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, JournalMode::Detail);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode, JournalMode::List);
}

#[rstest]
fn delete_key_is_a_no_op_on_an_empty_journal(ctx: AppTestCtx) {
    let mut app = ctx.app();
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.mode, JournalMode::List);
}

#[rstest]
fn rejecting_the_confirmation_keeps_the_entry(ctx: AppTestCtx) {
    let created = ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('d'));
    let JournalMode::ConfirmDelete { target } = &app.mode else {
        panic!("expected delete confirmation, got: {:?}", app.mode);
    };
    assert_eq!(Some(target), created.id());

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.mode, JournalMode::List);
    assert_eq!(app.journal.len(), 1);
    assert!(ctx.store.entry_path(created.id().unwrap()).exists());
}

#[rstest]
fn pressing_d_again_cancels_the_confirmation(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('d'));
    assert!(matches!(app.mode, JournalMode::ConfirmDelete { .. }));

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.mode, JournalMode::List);
    assert_eq!(app.journal.len(), 1);
}

#[rstest]
fn confirmed_delete_removes_the_entry_everywhere(ctx: AppTestCtx) {
    let created = ctx.seed("Ocean Beach", "fun");
    ctx.seed("Lowers", "crowded");
    let mut app = ctx.app();

    // Both entries share a created_at second; selection 0 is the first
    // inserted on ties, but pin the target explicitly to be safe.
    app.select_entry(created.id().unwrap());
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));

    assert_eq!(app.mode, JournalMode::List);
    assert_eq!(app.journal.len(), 1);
    assert!(app.journal.position_of(created.id().unwrap()).is_none());
    assert!(!ctx.store.entry_path(created.id().unwrap()).exists());
    assert_eq!(ctx.store.list().unwrap().entries.len(), 1);
}

#[cfg(unix)]
#[rstest]
fn confirmed_delete_prunes_the_list_even_when_the_disk_delete_fails(ctx: AppTestCtx) {
    use std::os::unix::fs::PermissionsExt;

    let created = ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    let root = ctx.store.root().to_path_buf();
    std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o555)).unwrap();

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));

    std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o755)).unwrap();

    // The file survived, but the on-screen journal no longer shows the entry
    // and the failure was surfaced.
    assert!(ctx.store.entry_path(created.id().unwrap()).exists());
    assert_eq!(app.journal.len(), 0);
    assert_eq!(app.mode, JournalMode::List);
    let toast = app.toast.as_ref().expect("failure toast");
    assert!(toast.message.contains("Delete failed"));
}

#[rstest]
fn filter_narrows_the_list_and_esc_clears_it(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "glassy dawn");
    ctx.seed("Lowers", "crowded lineup");
    let mut app = ctx.app();
    assert_eq!(app.visible_indices.len(), 2);

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "glassy");
    assert_eq!(app.visible_indices.len(), 1);

    press(&mut app, KeyCode::Enter);
    assert!(!app.filter_editing);
    assert_eq!(app.filter, "glassy");

    // Esc in list mode drops the committed filter.
    press(&mut app, KeyCode::Esc);
    assert!(app.filter.is_empty());
    assert_eq!(app.visible_indices.len(), 2);
}

#[rstest]
fn filter_matches_comments_case_insensitively(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "Glassy At Dawn");
    ctx.seed("Lowers", "crowded");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "glassy");
    assert_eq!(app.visible_indices.len(), 1);
    assert_eq!(app.selected_entry().unwrap().spot(), "Ocean Beach");
}

#[rstest]
fn create_wizard_saves_and_selects_the_new_entry(ctx: AppTestCtx) {
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.pane, Pane::Create);

    type_text(&mut app, "Blacks");
    press(&mut app, KeyCode::Enter); // spot -> session time
    press(&mut app, KeyCode::Enter); // default session time
    press(&mut app, KeyCode::Enter); // default wave height
    type_text(&mut app, "heavy");
    press(&mut app, KeyCode::Enter); // comments -> confirm
    press(&mut app, KeyCode::Enter); // save

    assert_eq!(app.pane, Pane::Journal);
    assert_eq!(app.journal.len(), 1);
    let selected = app.selected_entry().expect("new entry selected");
    assert_eq!(selected.spot(), "Blacks");
    assert!(selected.id().is_some());
    assert_eq!(ctx.store.list().unwrap().entries.len(), 1);
}

#[rstest]
fn discarding_the_wizard_saves_nothing(ctx: AppTestCtx) {
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('c'));
    type_text(&mut app, "Blacks");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.pane, Pane::Journal);
    assert!(app.journal.is_empty());
    assert!(ctx.store.list().unwrap().entries.is_empty());
}

#[cfg(unix)]
#[rstest]
fn save_failure_keeps_the_journal_unchanged(ctx: AppTestCtx) {
    use std::os::unix::fs::PermissionsExt;

    let mut app = ctx.app();
    press(&mut app, KeyCode::Char('c'));
    type_text(&mut app, "Blacks");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);

    let root = ctx.store.root().to_path_buf();
    std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o555)).unwrap();
    press(&mut app, KeyCode::Enter); // confirm save
    std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(app.journal.is_empty());
    let toast = app.toast.as_ref().expect("failure toast");
    assert!(toast.message.contains("Save failed"));
}

#[rstest]
fn ctrl_c_always_quits(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('/'));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[rstest]
fn q_does_not_quit_while_editing_the_filter(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit);
    assert_eq!(app.filter, "q");
}

#[rstest]
fn detail_falls_back_to_list_when_the_entry_vanishes(ctx: AppTestCtx) {
    let created = ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, JournalMode::Detail);

    app.journal.remove_by_id(created.id().unwrap());
    app.refresh_visible();
    app.ensure_valid_mode();
    assert_eq!(app.mode, JournalMode::List);
}

#[rstest]
fn draw_renders_every_pane_without_panicking(ctx: AppTestCtx) {
    use ratatui::{backend::TestBackend, Terminal};

    ctx.seed("Ocean Beach", "fun");
    let mut app = ctx.app();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    // List, detail, delete confirmation, and the create wizard.
    terminal.draw(|frame| super::draw(frame, &mut app)).unwrap();

    press(&mut app, KeyCode::Enter);
    terminal.draw(|frame| super::draw(frame, &mut app)).unwrap();

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('d'));
    terminal.draw(|frame| super::draw(frame, &mut app)).unwrap();

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('c'));
    terminal.draw(|frame| super::draw(frame, &mut app)).unwrap();
}

#[rstest]
fn skipped_files_surface_as_a_toast(ctx: AppTestCtx) {
    ctx.seed("Ocean Beach", "fun");
    std::fs::write(ctx.store.root().join("broken.json"), "{ nope").unwrap();

    let app = ctx.app();
    let toast = app.toast.as_ref().expect("skip toast");
    assert!(toast.message.contains("Skipped 1"));
    assert_eq!(app.journal.len(), 1);
}
