// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NavWindow;

/// Tracks which windows still need their full contents sent.
///
/// The presentation layer keeps every cell it has drawn, so each navigable
/// window is filled exactly once per process. Later navigations reply with an
/// empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    accounting_pending: bool,
    settings_pending: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            accounting_pending: true,
            settings_pending: true,
        }
    }
}

impl NavigationState {
    pub const fn is_pending(&self, window: NavWindow) -> bool {
        match window {
            NavWindow::Accounting => self.accounting_pending,
            NavWindow::Settings => self.settings_pending,
        }
    }

    /// Returns true the first time it is called for `window`, false afterwards.
    pub fn take_first_render(&mut self, window: NavWindow) -> bool {
        let flag = match window {
            NavWindow::Accounting => &mut self.accounting_pending,
            NavWindow::Settings => &mut self.settings_pending,
        };
        std::mem::replace(flag, false)
    }
}
