// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::LedgerRowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    #[serde(rename = "window_main")]
    Main,
    #[serde(rename = "window_accounting")]
    Accounting,
    #[serde(rename = "window_settings")]
    Settings,
}

impl WindowKind {
    pub const ALL: [Self; 3] = [Self::Main, Self::Accounting, Self::Settings];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "window_main",
            Self::Accounting => "window_accounting",
            Self::Settings => "window_settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "window_main" => Some(Self::Main),
            "window_accounting" => Some(Self::Accounting),
            "window_settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Windows whose full contents are sent once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavWindow {
    Accounting,
    Settings,
}

impl NavWindow {
    pub const ALL: [Self; 2] = [Self::Accounting, Self::Settings];

    pub const fn window(self) -> WindowKind {
        match self {
            Self::Accounting => WindowKind::Accounting,
            Self::Settings => WindowKind::Settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingName {
    BackgroundColor,
    TextColor,
    Font,
}

impl SettingName {
    pub const ALL: [Self; 3] = [Self::BackgroundColor, Self::TextColor, Self::Font];

    /// Name as stored in the `SETTINGS` table.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackgroundColor => "Background color",
            Self::TextColor => "Text color",
            Self::Font => "Font",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Background color" => Some(Self::BackgroundColor),
            "Text color" => Some(Self::TextColor),
            "Font" => Some(Self::Font),
            _ => None,
        }
    }

    /// Option key understood by the presentation layer.
    pub const fn theme_key(self) -> &'static str {
        match self {
            Self::BackgroundColor => "background",
            Self::TextColor => "fg",
            Self::Font => "font",
        }
    }

    pub const fn default_value(self) -> &'static str {
        match self {
            Self::BackgroundColor => "white",
            Self::TextColor => "black",
            Self::Font => "Arial",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub id: LedgerRowId,
    pub comment: String,
    pub category: String,
    pub value: f64,
    pub date: String,
}

impl LedgerRow {
    pub fn blank(id: LedgerRowId) -> Self {
        Self {
            id,
            comment: String::new(),
            category: String::new(),
            value: 0.0,
            date: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.comment.is_empty() && self.category.is_empty() && self.value == 0.0 && self.date.is_empty()
    }

    /// Grid columns in display order; the id is never part of the grid.
    pub fn display_values(&self) -> [CellValue; 4] {
        [
            CellValue::from_text(&self.comment),
            CellValue::from_text(&self.category),
            CellValue::from_number(self.value),
            CellValue::from_text(&self.date),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRow {
    pub name: String,
    pub value: String,
}

impl SettingRow {
    pub fn known_name(&self) -> Option<SettingName> {
        SettingName::parse(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn blank() -> Self {
        Self::Text(String::new())
    }

    pub fn from_text(value: &str) -> Self {
        Self::Text(value.to_owned())
    }

    /// Zero renders blank, same as a value that was never entered.
    pub fn from_number(value: f64) -> Self {
        if value == 0.0 || value.is_nan() {
            Self::blank()
        } else {
            Self::Number(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub data: CellValue,
}

pub fn ledger_cells(rows: &[LedgerRow]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(rows.len() * 4);
    for (row, record) in rows.iter().enumerate() {
        for (col, data) in record.display_values().into_iter().enumerate() {
            cells.push(Cell { row, col, data });
        }
    }
    cells
}

pub fn setting_cells(rows: &[SettingRow]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(rows.len() * 2);
    for (row, setting) in rows.iter().enumerate() {
        cells.push(Cell {
            row,
            col: 0,
            data: CellValue::from_text(&setting.name),
        });
        cells.push(Cell {
            row,
            col: 1,
            data: CellValue::from_text(&setting.value),
        });
    }
    cells
}

/// Theme options keyed by presentation vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl Theme {
    /// Settings outside the recognized set are dropped; a repeated name keeps the last value.
    pub fn from_settings<'a>(rows: impl IntoIterator<Item = &'a SettingRow>) -> Self {
        let mut theme = Self::default();
        for row in rows {
            if let Some(name) = row.known_name() {
                *theme.slot_mut(name) = Some(row.value.clone());
            }
        }
        theme
    }

    pub fn get(&self, name: SettingName) -> Option<&str> {
        match name {
            SettingName::BackgroundColor => self.background.as_deref(),
            SettingName::TextColor => self.fg.as_deref(),
            SettingName::Font => self.font.as_deref(),
        }
    }

    fn slot_mut(&mut self, name: SettingName) -> &mut Option<String> {
        match name {
            SettingName::BackgroundColor => &mut self.background,
            SettingName::TextColor => &mut self.fg,
            SettingName::Font => &mut self.font,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Cells(Vec<Cell>),
    Theme(Theme),
}

impl Payload {
    pub fn empty() -> Self {
        Self::Cells(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Cells(cells) if cells.is_empty())
    }

    pub fn cells(&self) -> Option<&[Cell]> {
        match self {
            Self::Cells(cells) => Some(cells),
            Self::Theme(_) => None,
        }
    }

    pub fn theme(&self) -> Option<&Theme> {
        match self {
            Self::Theme(theme) => Some(theme),
            Self::Cells(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub window: WindowKind,
    pub payload: Payload,
}

impl Reply {
    pub fn new(window: WindowKind, payload: Payload) -> Self {
        Self { window, payload }
    }
}
