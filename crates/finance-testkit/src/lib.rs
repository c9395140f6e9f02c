// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use finance_app::{EventKind, LedgerRow, LedgerRowId, SettingName};
use serde_json::{Value, json};
use std::path::PathBuf;

const EXPENSE_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Rent",
    "Utilities",
    "Transport",
    "Dining",
    "Health",
    "Clothing",
    "Entertainment",
    "Gifts",
    "Education",
];

const INCOME_CATEGORIES: [&str; 3] = ["Salary", "Freelance", "Interest"];

const EXPENSE_COMMENTS: [&str; 14] = [
    "Weekly shop",
    "Monthly rent",
    "Electricity bill",
    "Water bill",
    "Bus pass",
    "Taxi home",
    "Lunch with team",
    "Pharmacy",
    "Winter jacket",
    "Cinema tickets",
    "Birthday present",
    "Online course",
    "Coffee beans",
    "Internet plan",
];

const INCOME_COMMENTS: [&str; 5] = [
    "Paycheck",
    "Side project invoice",
    "Savings interest",
    "Bonus",
    "Refund",
];

const REFERENCE_YEAR: i32 = 2024;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Produces plausible ledger entries; the same seed always yields the same rows.
#[derive(Debug, Clone)]
pub struct LedgerFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl LedgerFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn entry(&mut self, id: LedgerRowId) -> LedgerRow {
        let income = self.rng.int_n(6) == 0;
        let (comment, category, value) = if income {
            let cents = self.int_range(20_000, 450_000);
            (
                self.pick(&INCOME_COMMENTS),
                self.pick(&INCOME_CATEGORIES),
                cents as f64 / 100.0,
            )
        } else {
            let cents = self.int_range(150, 120_000);
            (
                self.pick(&EXPENSE_COMMENTS),
                self.pick(&EXPENSE_CATEGORIES),
                -(cents as f64) / 100.0,
            )
        };

        LedgerRow {
            id,
            comment: comment.to_owned(),
            category: category.to_owned(),
            value,
            date: self.date(),
        }
    }

    /// Entries for ids `0..count`.
    pub fn entries(&mut self, count: usize) -> Vec<LedgerRow> {
        (0..count)
            .map(|id| self.entry(LedgerRowId::new(id as i64)))
            .collect()
    }

    fn date(&mut self) -> String {
        let month = self.int_range(1, 12);
        let day = self.int_range(1, 28);
        format!("{REFERENCE_YEAR}-{month:02}-{day:02}")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("FinanceAnalyzer.db");
    Ok((dir, db_path))
}

/// Event carrying only its tag, as sent by navigation buttons.
pub fn event(kind: EventKind) -> Value {
    json!({"type": kind.as_str(), "data": null})
}

pub fn update_row_event(row: &LedgerRow) -> Value {
    json!({
        "type": EventKind::AccountingUpdateRow.as_str(),
        "id": row.id.get(),
        "comment": row.comment,
        "category": row.category,
        "value": row.value,
        "date": row.date,
    })
}

pub fn update_setting_event(name: SettingName, value: &str) -> Value {
    json!({
        "type": EventKind::SettingsUpdateRow.as_str(),
        "name": name.as_str(),
        "value": value,
    })
}

pub fn expense_categories() -> &'static [&'static str] {
    &EXPENSE_CATEGORIES
}

pub fn income_categories() -> &'static [&'static str] {
    &INCOME_CATEGORIES
}
