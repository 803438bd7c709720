//! SQLite-backed index storage.
//!
//! The schema is a single unkeyed table of `(root, code, bin)` rows plus a
//! one-row `build_info` table. A rebuild deletes every row and re-inserts
//! inside one IMMEDIATE transaction. On-disk indexes run in WAL mode, so
//! readers on other connections keep seeing the previous index until the
//! commit lands, however large the rebuild grows. A rebuild that is dropped
//! without committing leaves the previous index untouched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::error::{LmcError, Result};

use super::BinaryEntry;

/// File name of the index inside the data directory.
pub const DB_FILE_NAME: &str = "lmc.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Readers must never wait on a rebuild's exclusive lock.
const PRAGMAS: &str = "pragma journal_mode = wal;";

const SCHEMA: &str = "
    create table if not exists binaries (
        root text not null,
        code text not null,
        bin text not null
    );
    create index if not exists binaries_bin on binaries (bin);
    create table if not exists build_info (
        id integer primary key check (id = 1),
        built_at text not null,
        roots integer not null,
        module_files integer not null,
        entries integer not null,
        warnings integer not null
    );
";

const INSERT_ENTRY: &str = "insert into binaries (root, code, bin) values (?1, ?2, ?3)";
const SELECT_EXACT: &str = "select root, code, bin from binaries where bin = ?1 order by rowid";
const SELECT_LIKE: &str =
    "select root, code, bin from binaries where bin like ?1 escape '\\' order by rowid";
const SELECT_CONTAINS: &str =
    "select root, code, bin from binaries where instr(bin, ?1) > 0 order by rowid";

/// Summary of the last committed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub built_at: DateTime<Utc>,
    pub roots: usize,
    pub module_files: usize,
    pub entries: usize,
    pub warnings: usize,
}

/// Receives entries discovered by the crawler.
pub trait EntrySink {
    /// Accept one entry. A failure skips only this entry.
    fn accept(&mut self, entry: BinaryEntry) -> Result<()>;
}

impl EntrySink for Vec<BinaryEntry> {
    fn accept(&mut self, entry: BinaryEntry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

/// The binary index.
pub struct IndexStore {
    conn: Connection,
    path: Option<PathBuf>,
    case_sensitive: bool,
}

impl IndexStore {
    /// Open (creating if needed) the index at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreOpen` if the database cannot be opened or its schema
    /// cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let open_err = |source| LmcError::StoreOpen {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_err)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_err)?;
        conn.execute_batch(PRAGMAS).map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        tracing::debug!("Opened index at {}", path.display());

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            case_sensitive: false,
        })
    }

    /// Open a private in-memory index.
    pub fn open_in_memory() -> Result<Self> {
        let open_err = |source| LmcError::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;

        Ok(Self {
            conn,
            path: None,
            case_sensitive: false,
        })
    }

    /// Make similar searches case-sensitive.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Where the index lives on disk, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Start replacing the index.
    ///
    /// # Errors
    ///
    /// Returns `Transaction` if another writer holds the database past the
    /// busy timeout.
    pub fn begin_rebuild(&mut self) -> Result<Rebuild<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| LmcError::Transaction {
                message: e.to_string(),
            })?;
        Ok(Rebuild { tx, inserted: 0 })
    }

    /// Entries whose binary name equals `bin`, in insertion order.
    pub fn search_exact(&self, bin: &str) -> Result<Vec<BinaryEntry>> {
        self.query_entries(SELECT_EXACT, bin)
    }

    /// Entries whose binary name contains `bin`, in insertion order.
    ///
    /// ASCII letters match regardless of case unless the store was opened
    /// case-sensitive. `%`, `_` and `\` in `bin` match literally.
    pub fn search_similar(&self, bin: &str) -> Result<Vec<BinaryEntry>> {
        if self.case_sensitive {
            self.query_entries(SELECT_CONTAINS, bin)
        } else {
            self.query_entries(SELECT_LIKE, &like_pattern(bin))
        }
    }

    /// Number of entries in the index.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from binaries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The last committed build, if any.
    pub fn build_info(&self) -> Result<Option<BuildInfo>> {
        let info = self
            .conn
            .query_row(
                "select built_at, roots, module_files, entries, warnings from build_info where id = 1",
                [],
                |row| {
                    Ok(BuildInfo {
                        built_at: row.get(0)?,
                        roots: row.get::<_, i64>(1)? as usize,
                        module_files: row.get::<_, i64>(2)? as usize,
                        entries: row.get::<_, i64>(3)? as usize,
                        warnings: row.get::<_, i64>(4)? as usize,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }

    fn query_entries(&self, sql: &str, param: &str) -> Result<Vec<BinaryEntry>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![param], |row| {
            Ok(BinaryEntry {
                root: row.get(0)?,
                code: row.get(1)?,
                bin: row.get(2)?,
            })
        })?;
        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

/// A pending replacement of the index.
///
/// Dropping a `Rebuild` without calling [`commit`](Rebuild::commit) rolls
/// everything back.
pub struct Rebuild<'a> {
    tx: Transaction<'a>,
    inserted: usize,
}

impl Rebuild<'_> {
    /// Delete every entry. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        Ok(self.tx.execute("delete from binaries", [])?)
    }

    /// Add one entry.
    pub fn insert(&mut self, entry: &BinaryEntry) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(INSERT_ENTRY)?;
        stmt.execute(params![entry.root, entry.code, entry.bin])?;
        self.inserted += 1;
        Ok(())
    }

    /// Replace the stored build summary.
    pub fn record_build(&mut self, info: &BuildInfo) -> Result<()> {
        self.tx.execute(
            "insert or replace into build_info (id, built_at, roots, module_files, entries, warnings) \
             values (1, ?1, ?2, ?3, ?4, ?5)",
            params![
                info.built_at,
                info.roots as i64,
                info.module_files as i64,
                info.entries as i64,
                info.warnings as i64
            ],
        )?;
        Ok(())
    }

    /// Entries inserted so far.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Make the new index visible. Returns the number of entries inserted.
    pub fn commit(self) -> Result<usize> {
        let inserted = self.inserted;
        self.tx.commit().map_err(|e| LmcError::Transaction {
            message: e.to_string(),
        })?;
        Ok(inserted)
    }
}

impl EntrySink for Rebuild<'_> {
    fn accept(&mut self, entry: BinaryEntry) -> Result<()> {
        self.insert(&entry)
    }
}

/// Build a `LIKE` pattern matching any string containing `needle`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
