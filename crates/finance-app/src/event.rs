// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Events raised by the presentation layer.
//!
//! On the wire an event is a JSON object whose `type` tag names the handler
//! and whose remaining keys are the handler's fields. Parsing turns that
//! object into a closed [`Event`] value; anything that does not fit fails with
//! an [`EventError`] before a handler runs.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::ids::LedgerRowId;
use crate::model::{LedgerRow, SettingName};
use crate::validation::{check_amount, check_row_id, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StartSetup,
    AccountingNavigation,
    AccountingUpdateRow,
    SettingsNavigation,
    SettingsUpdateRow,
    ThemeSetup,
}

impl EventKind {
    pub const ALL: [Self; 6] = [
        Self::StartSetup,
        Self::AccountingNavigation,
        Self::AccountingUpdateRow,
        Self::SettingsNavigation,
        Self::SettingsUpdateRow,
        Self::ThemeSetup,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartSetup => "start_setup",
            Self::AccountingNavigation => "accounting_navigation",
            Self::AccountingUpdateRow => "accounting_update_row",
            Self::SettingsNavigation => "settings_navigation",
            Self::SettingsUpdateRow => "settings_update_row",
            Self::ThemeSetup => "theme_setup",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start_setup" => Some(Self::StartSetup),
            "accounting_navigation" => Some(Self::AccountingNavigation),
            "accounting_update_row" => Some(Self::AccountingUpdateRow),
            "settings_navigation" => Some(Self::SettingsNavigation),
            "settings_update_row" => Some(Self::SettingsUpdateRow),
            "theme_setup" => Some(Self::ThemeSetup),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("event must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("event has no `type` tag")]
    MissingType,

    #[error("unknown event type {0:?}")]
    UnknownEventType(String),

    #[error("`{kind}` event is missing field `{field}`")]
    MissingField {
        kind: EventKind,
        field: &'static str,
    },

    #[error("`{kind}` event has invalid `{field}`: {reason}")]
    InvalidField {
        kind: EventKind,
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartSetup,
    AccountingNavigation,
    AccountingUpdateRow(LedgerRow),
    SettingsNavigation,
    SettingsUpdateRow { name: SettingName, value: String },
    ThemeSetup,
}

impl Event {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::StartSetup => EventKind::StartSetup,
            Self::AccountingNavigation => EventKind::AccountingNavigation,
            Self::AccountingUpdateRow(_) => EventKind::AccountingUpdateRow,
            Self::SettingsNavigation => EventKind::SettingsNavigation,
            Self::SettingsUpdateRow { .. } => EventKind::SettingsUpdateRow,
            Self::ThemeSetup => EventKind::ThemeSetup,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, EventError> {
        let object = value
            .as_object()
            .ok_or_else(|| EventError::NotAnObject(json_type_name(value)))?;
        let kind = match object.get("type") {
            Some(Value::String(tag)) => {
                EventKind::parse(tag).ok_or_else(|| EventError::UnknownEventType(tag.clone()))?
            }
            Some(other) => return Err(EventError::UnknownEventType(other.to_string())),
            None => return Err(EventError::MissingType),
        };

        let fields = Fields { kind, object };
        let event = match kind {
            EventKind::StartSetup => Self::StartSetup,
            EventKind::AccountingNavigation => Self::AccountingNavigation,
            EventKind::AccountingUpdateRow => Self::AccountingUpdateRow(LedgerRow {
                id: fields.row_id("id")?,
                comment: fields.text("comment")?,
                category: fields.text("category")?,
                value: fields.amount("value")?,
                date: fields.text("date")?,
            }),
            EventKind::SettingsNavigation => Self::SettingsNavigation,
            EventKind::SettingsUpdateRow => Self::SettingsUpdateRow {
                name: fields.setting_name("name")?,
                value: fields.text("value")?,
            },
            EventKind::ThemeSetup => Self::ThemeSetup,
        };
        Ok(event)
    }
}

struct Fields<'a> {
    kind: EventKind,
    object: &'a Map<String, Value>,
}

impl Fields<'_> {
    fn get(&self, field: &'static str) -> Result<&Value, EventError> {
        self.object.get(field).ok_or(EventError::MissingField {
            kind: self.kind,
            field,
        })
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> EventError {
        EventError::InvalidField {
            kind: self.kind,
            field,
            reason: reason.into(),
        }
    }

    fn text(&self, field: &'static str) -> Result<String, EventError> {
        match self.get(field)? {
            Value::String(value) => Ok(value.clone()),
            other => Err(self.invalid(field, format!("expected text, got {}", json_type_name(other)))),
        }
    }

    fn row_id(&self, field: &'static str) -> Result<LedgerRowId, EventError> {
        let value = self.get(field)?;
        let raw = value.as_i64().ok_or_else(|| {
            self.invalid(
                field,
                format!("expected an integer, got {}", json_type_name(value)),
            )
        })?;
        check_row_id(raw)
            .map(LedgerRowId::new)
            .map_err(|error| self.invalid(field, error.to_string()))
    }

    fn amount(&self, field: &'static str) -> Result<f64, EventError> {
        let parsed = match self.get(field)? {
            Value::Number(number) => match number.as_f64() {
                Some(value) => check_amount(value),
                None => return Err(self.invalid(field, "number out of range")),
            },
            Value::String(text) => parse_amount(text),
            other => {
                return Err(self.invalid(
                    field,
                    format!("expected a number, got {}", json_type_name(other)),
                ));
            }
        };
        parsed.map_err(|error| self.invalid(field, error.to_string()))
    }

    fn setting_name(&self, field: &'static str) -> Result<SettingName, EventError> {
        let raw = self.text(field)?;
        SettingName::parse(&raw)
            .ok_or_else(|| self.invalid(field, format!("unknown setting {raw:?}")))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
