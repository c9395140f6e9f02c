// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use finance_app::{EventKind, LedgerRowId, NavWindow, Reply, SettingName, WindowKind};
use finance_core::{Controller, EventProcessor, Presenter};
use finance_db::Store;
use finance_testkit::{LedgerFaker, event, temp_db_path, update_row_event, update_setting_event};
use serde_json::{Value, json};
use std::collections::VecDeque;

/// Plays back a fixed list of user events and records every reply. Like the
/// desktop view, it answers a theme reply with `theme_setup`.
#[derive(Default)]
struct ScriptedPresenter {
    script: VecDeque<Value>,
    rendered: Vec<Reply>,
}

impl ScriptedPresenter {
    fn new(script: impl IntoIterator<Item = Value>) -> Self {
        Self {
            script: script.into_iter().collect(),
            rendered: Vec::new(),
        }
    }

    fn windows(&self) -> Vec<WindowKind> {
        self.rendered.iter().map(|reply| reply.window).collect()
    }
}

impl Presenter for ScriptedPresenter {
    fn render(&mut self, reply: &Reply) -> Result<Vec<Value>> {
        self.rendered.push(reply.clone());
        if reply.window == WindowKind::Main {
            return Ok(vec![event(EventKind::ThemeSetup)]);
        }
        Ok(Vec::new())
    }

    fn next_event(&mut self) -> Result<Option<Value>> {
        Ok(self.script.pop_front())
    }
}

#[test]
fn startup_applies_theme_then_opens_ledger() -> Result<()> {
    let processor = EventProcessor::new(Store::open_memory()?);
    let presenter = Controller::new(processor, ScriptedPresenter::default()).run()?;

    assert_eq!(
        presenter.windows(),
        vec![WindowKind::Main, WindowKind::Accounting]
    );
    assert_eq!(
        serde_json::to_value(&presenter.rendered[0].payload)?,
        json!({"background": "white", "fg": "black", "font": "Arial"})
    );
    assert_eq!(
        presenter.rendered[1].payload.cells().map(<[_]>::len),
        Some(80)
    );
    Ok(())
}

#[test]
fn settings_edit_round_trips_through_theme_back_to_settings() -> Result<()> {
    let processor = EventProcessor::new(Store::open_memory()?);
    let presenter = ScriptedPresenter::new([
        event(EventKind::SettingsNavigation),
        update_setting_event(SettingName::TextColor, "navy"),
    ]);
    let presenter = Controller::new(processor, presenter).run()?;

    assert_eq!(
        presenter.windows(),
        vec![
            WindowKind::Main,
            WindowKind::Accounting,
            WindowKind::Settings,
            WindowKind::Main,
            WindowKind::Settings,
        ]
    );
    assert_eq!(
        serde_json::to_value(&presenter.rendered[3].payload)?,
        json!({"background": "white", "fg": "navy", "font": "Arial"})
    );
    assert!(presenter.rendered[4].payload.is_empty());
    Ok(())
}

#[test]
fn controller_passes_last_reply_window_as_hint() -> Result<()> {
    let processor = EventProcessor::new(Store::open_memory()?);
    let mut controller = Controller::new(processor, ScriptedPresenter::default());
    assert_eq!(controller.last_window(), None);

    controller.dispatch(None)?;
    assert_eq!(controller.last_window(), Some(WindowKind::Main));

    controller.dispatch(Some(&event(EventKind::SettingsNavigation)))?;
    assert_eq!(controller.last_window(), Some(WindowKind::Settings));
    assert_eq!(controller.presenter().rendered.len(), 2);
    assert!(
        !controller
            .processor()
            .navigation()
            .is_pending(NavWindow::Settings)
    );
    Ok(())
}

#[test]
fn session_edits_persist_after_run() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let row = LedgerFaker::new(21).entry(LedgerRowId::new(19));

    let processor = EventProcessor::new(Store::open(&path)?);
    let presenter = ScriptedPresenter::new([update_row_event(&row)]);
    let presenter = Controller::new(processor, presenter).run()?;
    assert_eq!(
        presenter.rendered.last().and_then(|reply| reply.payload.cells().map(<[_]>::len)),
        Some(40 * 4)
    );

    let store = Store::open(&path)?;
    assert_eq!(store.ledger_len()?, 40);
    assert_eq!(store.get_ledger_row(row.id)?, Some(row));
    Ok(())
}

#[test]
fn unknown_event_stops_the_session() -> Result<()> {
    let processor = EventProcessor::new(Store::open_memory()?);
    let presenter = ScriptedPresenter::new([json!({"type": "goals_navigation"})]);

    let error = Controller::new(processor, presenter)
        .run()
        .err()
        .expect("unknown event should end the run with an error");
    assert!(error.to_string().contains("goals_navigation"));
    Ok(())
}
