// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use finance_app::{
    Event, LedgerRow, NavWindow, NavigationState, Payload, Reply, SettingName, WindowKind,
    ledger_cells, setting_cells,
};
use finance_db::{SchemaStatus, Store};
use serde_json::Value;
use tracing::{debug, info};

/// The model half of the application: owns the store and the navigation
/// flags, and answers each event with the window to draw and what to draw.
pub struct EventProcessor {
    store: Store,
    navigation: NavigationState,
}

impl EventProcessor {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            navigation: NavigationState::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Parses a raw event and runs its handler. A missing event is the
    /// startup request; the window hint is only logged, handlers pick the
    /// reply window.
    pub fn process(
        &mut self,
        window_hint: Option<WindowKind>,
        event: Option<&Value>,
    ) -> Result<Reply> {
        let hint = window_hint.unwrap_or(WindowKind::Main);
        let event = match event {
            Some(raw) => Event::from_value(raw)?,
            None => Event::StartSetup,
        };
        debug!(%hint, kind = %event.kind(), "processing event");

        let reply = self.handle(event)?;
        debug!(window = %reply.window, empty = reply.payload.is_empty(), "reply ready");
        Ok(reply)
    }

    pub fn handle(&mut self, event: Event) -> Result<Reply> {
        match event {
            Event::StartSetup => self.start_setup(),
            Event::AccountingNavigation => self.navigate(NavWindow::Accounting),
            Event::AccountingUpdateRow(row) => self.accounting_update_row(&row),
            Event::SettingsNavigation => self.navigate(NavWindow::Settings),
            Event::SettingsUpdateRow { name, value } => self.settings_update_row(name, &value),
            Event::ThemeSetup => self.theme_setup(),
        }
    }

    /// Flushes and closes the store. Consumes the processor so it runs once.
    pub fn close(self) -> Result<()> {
        info!("closing store");
        self.store.close()
    }

    fn start_setup(&mut self) -> Result<Reply> {
        if self.store.ensure_schema()? == SchemaStatus::Created {
            info!("initialized empty database");
        }
        self.theme_reply()
    }

    fn navigate(&mut self, window: NavWindow) -> Result<Reply> {
        if !self.navigation.is_pending(window) {
            return Ok(Reply::new(window.window(), Payload::empty()));
        }

        let cells = match window {
            NavWindow::Accounting => ledger_cells(&self.store.list_ledger()?),
            NavWindow::Settings => setting_cells(&self.store.list_settings()?),
        };
        self.navigation.take_first_render(window);
        Ok(Reply::new(window.window(), Payload::Cells(cells)))
    }

    fn accounting_update_row(&mut self, row: &LedgerRow) -> Result<Reply> {
        let grown = self.store.in_transaction(|store| {
            store.update_ledger_row(row)?;
            if row.id.is_last_in_page() {
                store.append_ledger_page().map(Some)
            } else {
                Ok(None)
            }
        })?;

        match grown {
            Some(ids) => {
                info!(
                    edited = row.id.get(),
                    first = ids.start,
                    last = ids.end - 1,
                    "last row of page edited; ledger grew"
                );
                let cells = ledger_cells(&self.store.list_ledger()?);
                Ok(Reply::new(WindowKind::Accounting, Payload::Cells(cells)))
            }
            None => Ok(Reply::new(WindowKind::Accounting, Payload::empty())),
        }
    }

    fn settings_update_row(&mut self, name: SettingName, value: &str) -> Result<Reply> {
        self.store.update_setting(name, value)?;
        self.theme_reply()
    }

    // Runs after the presentation layer applied a theme: at startup the
    // settings window was never shown, so open the ledger; otherwise the user
    // just edited a setting and goes back to the settings window.
    fn theme_setup(&mut self) -> Result<Reply> {
        if self.navigation.is_pending(NavWindow::Settings) {
            self.navigate(NavWindow::Accounting)
        } else {
            self.navigate(NavWindow::Settings)
        }
    }

    fn theme_reply(&self) -> Result<Reply> {
        let theme = self.store.theme()?;
        Ok(Reply::new(WindowKind::Main, Payload::Theme(theme)))
    }
}
