// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Rows are pre-allocated in blocks of this many blank entries.
pub const PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRowId(i64);

impl LedgerRowId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// True for the final row of its page, the row whose edit grows the ledger.
    pub const fn is_last_in_page(self) -> bool {
        self.0.rem_euclid(PAGE_SIZE) == PAGE_SIZE - 1
    }
}

impl From<i64> for LedgerRowId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
