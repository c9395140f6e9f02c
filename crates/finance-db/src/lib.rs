// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use finance_app::validation::parse_amount;
use finance_app::{LedgerRow, LedgerRowId, PAGE_SIZE, SettingName, SettingRow, Theme};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const APP_NAME: &str = "finance-analyzer";
pub const DB_FILE_NAME: &str = "FinanceAnalyzer.db";
pub const DB_PATH_ENV: &str = "FINANCE_ANALYZER_DB_PATH";

/// Blank ledger rows written when the schema is created.
pub const NUM_RECORDS_START: i64 = PAGE_SIZE;

const ACCOUNTING_TABLE: &str = "ACCOUNTING";
const SETTINGS_TABLE: &str = "SETTINGS";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        ACCOUNTING_TABLE,
        &["id", "comment", "category", "value", "date"],
    ),
    (SETTINGS_TABLE, &["name", "value"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    Existing,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Existence probe: both tables must be present for the store to be usable.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(table_exists(&self.conn, ACCOUNTING_TABLE)?
            && table_exists(&self.conn, SETTINGS_TABLE)?)
    }

    /// Creates and seeds both tables when neither exists; otherwise checks the
    /// existing layout. Safe to call on every startup.
    pub fn ensure_schema(&self) -> Result<SchemaStatus> {
        let accounting = table_exists(&self.conn, ACCOUNTING_TABLE)?;
        let settings = table_exists(&self.conn, SETTINGS_TABLE)?;

        match (accounting, settings) {
            (true, true) => {
                validate_schema(&self.conn)?;
                Ok(SchemaStatus::Existing)
            }
            (false, false) => {
                self.in_transaction(|store| store.create_schema())?;
                info!(
                    ledger_rows = NUM_RECORDS_START,
                    settings = SettingName::ALL.len(),
                    "created database schema"
                );
                Ok(SchemaStatus::Created)
            }
            (true, false) => bail!(
                "database has table `{ACCOUNTING_TABLE}` but no `{SETTINGS_TABLE}`; move the file aside to start fresh"
            ),
            (false, true) => bail!(
                "database has table `{SETTINGS_TABLE}` but no `{ACCOUNTING_TABLE}`; move the file aside to start fresh"
            ),
        }
    }

    fn create_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")?;
        self.insert_blank_rows(0..NUM_RECORDS_START)?;
        self.seed_default_settings()
    }

    fn seed_default_settings(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT INTO SETTINGS (name, value) VALUES (?, ?)")
            .context("prepare settings insert")?;
        for name in SettingName::ALL {
            stmt.execute(params![name.as_str(), name.default_value()])
                .with_context(|| format!("insert default setting {}", name.as_str()))?;
        }
        Ok(())
    }

    /// Runs `f` inside one transaction; an error from `f` rolls everything back.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin transaction")?;
        let value = f(self)?;
        tx.commit().context("commit transaction")?;
        Ok(value)
    }

    pub fn list_ledger(&self) -> Result<Vec<LedgerRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT id, comment, category, value, date
                FROM ACCOUNTING
                ORDER BY id ASC
                ",
            )
            .context("prepare ledger query")?;
        let rows = stmt
            .query_map([], ledger_row_from_sql)
            .context("query ledger")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect ledger rows")
    }

    pub fn get_ledger_row(&self, id: LedgerRowId) -> Result<Option<LedgerRow>> {
        self.conn
            .query_row(
                "
                SELECT id, comment, category, value, date
                FROM ACCOUNTING
                WHERE id = ?
                ",
                params![id.get()],
                ledger_row_from_sql,
            )
            .optional()
            .with_context(|| format!("load ledger row {}", id.get()))
    }

    pub fn ledger_len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ACCOUNTING", [], |row| row.get(0))
            .context("count ledger rows")?;
        usize::try_from(count).context("ledger row count out of range")
    }

    pub fn max_ledger_id(&self) -> Result<Option<LedgerRowId>> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM ACCOUNTING", [], |row| row.get(0))
            .context("query highest ledger id")?;
        Ok(max.map(LedgerRowId::new))
    }

    pub fn update_ledger_row(&self, row: &LedgerRow) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "
                UPDATE ACCOUNTING
                SET comment = ?, category = ?, value = ?, date = ?
                WHERE id = ?
                ",
                params![row.comment, row.category, row.value, row.date, row.id.get()],
            )
            .with_context(|| format!("update ledger row {}", row.id.get()))?;
        if changed == 0 {
            bail!(
                "ledger row {} does not exist; reopen the accounting window to reload rows",
                row.id.get()
            );
        }
        Ok(())
    }

    /// Appends one page of blank rows after the highest id and returns their ids.
    pub fn append_ledger_page(&self) -> Result<Range<i64>> {
        let next = self
            .max_ledger_id()?
            .map_or(0, |id| id.get().saturating_add(1));
        let ids = next..next.saturating_add(PAGE_SIZE);
        self.insert_blank_rows(ids.clone())?;
        debug!(first = ids.start, last = ids.end - 1, "appended ledger page");
        Ok(ids)
    }

    fn insert_blank_rows(&self, ids: Range<i64>) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT INTO ACCOUNTING (id, comment, category, value, date) VALUES (?, ?, ?, ?, ?)")
            .context("prepare ledger insert")?;
        for id in ids {
            let blank = LedgerRow::blank(LedgerRowId::new(id));
            stmt.execute(params![
                blank.id.get(),
                blank.comment,
                blank.category,
                blank.value,
                blank.date
            ])
            .with_context(|| format!("insert blank ledger row {id}"))?;
        }
        Ok(())
    }

    pub fn list_settings(&self) -> Result<Vec<SettingRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, value FROM SETTINGS ORDER BY name ASC")
            .context("prepare settings query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SettingRow {
                    name: value_ref_to_string(row.get_ref(0)?),
                    value: value_ref_to_string(row.get_ref(1)?),
                })
            })
            .context("query settings")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect settings")
    }

    pub fn get_setting(&self, name: SettingName) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM SETTINGS WHERE name = ?",
                params![name.as_str()],
                |row| Ok(value_ref_to_string(row.get_ref(0)?)),
            )
            .optional()
            .with_context(|| format!("read setting {}", name.as_str()))
    }

    pub fn update_setting(&self, name: SettingName, value: &str) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE SETTINGS SET value = ? WHERE name = ?",
                params![value, name.as_str()],
            )
            .with_context(|| format!("update setting {}", name.as_str()))?;
        if changed == 0 {
            bail!(
                "setting `{}` is missing from the database; move the file aside to recreate defaults",
                name.as_str()
            );
        }
        Ok(())
    }

    pub fn theme(&self) -> Result<Theme> {
        let settings = self.list_settings()?;
        Ok(Theme::from_settings(&settings))
    }

    /// Flushes the write-ahead log and closes the connection.
    pub fn close(self) -> Result<()> {
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .context("checkpoint database")?;
        self.conn
            .close()
            .map_err(|(_, error)| error)
            .context("close database")
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(DB_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        anyhow!("cannot resolve home directory; set {DB_PATH_ENV} to a writable database path")
    })?;
    Ok(home.join(DB_FILE_NAME))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn ledger_row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerRow> {
    Ok(LedgerRow {
        id: LedgerRowId::new(row.get(0)?),
        comment: value_ref_to_string(row.get_ref(1)?),
        category: value_ref_to_string(row.get_ref(2)?),
        value: amount_from_value(row.get_ref(3)?)?,
        date: value_ref_to_string(row.get_ref(4)?),
    })
}

fn value_ref_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(value) => String::from_utf8_lossy(value).into_owned(),
        ValueRef::Blob(value) => format!("{value:?}"),
    }
}

// Older files may hold the amount as text: SQLite keeps '' and non-numeric
// strings as TEXT even in a REAL column.
fn amount_from_value(value: ValueRef<'_>) -> rusqlite::Result<f64> {
    match value {
        ValueRef::Null => Ok(0.0),
        ValueRef::Integer(value) => Ok(value as f64),
        ValueRef::Real(value) => Ok(value),
        ValueRef::Text(raw) => {
            let text = String::from_utf8_lossy(raw);
            parse_amount(&text).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("stored amount {text:?}: {error}"),
                    )),
                )
            })
        }
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            3,
            "value".to_owned(),
            rusqlite::types::Type::Blob,
        )),
    }
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(&column.to_ascii_lowercase()))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; this file was not written by FinanceAnalyzer",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ? COLLATE NOCASE
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| {
            row.get::<_, String>(1).map(|name| name.to_ascii_lowercase())
        })
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}
