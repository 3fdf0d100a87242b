//! SQLite-backed schedule store.
//!
//! One `schedule` table holds every boundary record:
//!
//! ```text
//! owner TEXT | label TEXT | type TEXT | value TEXT | state INTEGER | time TEXT | id INTEGER
//! ```
//!
//! `state` is 1 for a rise and 0 for a fall; `time` is `HH:MM:SS`; `value`
//! is the recurrence value as text (weekday/month-day number or ISO date);
//! `id` is the group id shared by all records of one request.

use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{Result, UptimeError};
use crate::types::{BoundaryRecord, EdgeKind, Recurrence};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS schedule
    (owner TEXT,
     label TEXT,
     type  TEXT,
     value TEXT,
     state INTEGER,
     time  TEXT,
     id    INTEGER)";

const COLUMNS: &str = "owner, label, type, value, state, time, id";

pub struct ScheduleStore {
    conn: Connection,
}

impl ScheduleStore {
    /// Open or create the database at `path`, ensuring the schedule table
    /// exists.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("opening database: {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests and throwaway queries.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Drop and recreate the schedule table, discarding all records.
    pub fn recreate(&self) -> Result<()> {
        debug!("recreating schedule table");
        self.conn.execute("DROP TABLE IF EXISTS schedule", [])?;
        self.conn.execute(SCHEMA, [])?;
        Ok(())
    }

    /// Atomically replace every record sharing the group id of `records`
    /// with `records` themselves. Registering the same request twice leaves
    /// the same record set as registering it once.
    pub fn replace_group(&mut self, records: &[BoundaryRecord]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        debug!(group_id = first.group_id, n = records.len(), "replacing group");
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM schedule WHERE id = ?1", params![first.group_id])?;
        for rec in records {
            tx.execute(
                "INSERT INTO schedule VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    rec.owner,
                    rec.label,
                    rec.recurrence.type_str(),
                    rec.recurrence.value_str(),
                    rec.kind.state(),
                    rec.time.format("%H:%M:%S").to_string(),
                    rec.group_id,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete all records of one group. Returns the number of rows removed.
    pub fn delete_group(&self, group_id: i64) -> Result<usize> {
        debug!(group_id, "deleting group");
        Ok(self
            .conn
            .execute("DELETE FROM schedule WHERE id = ?1", params![group_id])?)
    }

    /// Delete all records of one owner.
    pub fn delete_owner(&self, owner: &str) -> Result<usize> {
        debug!(owner, "deleting owner");
        Ok(self
            .conn
            .execute("DELETE FROM schedule WHERE owner = ?1", params![owner])?)
    }

    /// Delete all records of one owner/label pair.
    pub fn delete_owner_label(&self, owner: &str, label: &str) -> Result<usize> {
        debug!(owner, label, "deleting owner/label");
        Ok(self.conn.execute(
            "DELETE FROM schedule WHERE owner = ?1 AND label = ?2",
            params![owner, label],
        )?)
    }

    /// Every stored record, in insertion order.
    pub fn list_all(&self) -> Result<Vec<BoundaryRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM schedule"))?;
        let rows = stmt.query_map([], read_row)?;
        collect_records(rows)
    }

    /// The boundary records firing on `date`: weekly records matching its
    /// ISO weekday, monthly records matching its day-of-month, and exact
    /// dates matching it, ordered by time of day with falls before rises at
    /// equal times.
    pub fn for_date(&self, date: NaiveDate) -> Result<Vec<BoundaryRecord>> {
        let dow = date.weekday().number_from_monday().to_string();
        let dom = date.day().to_string();
        let iso = date.format("%Y-%m-%d").to_string();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM schedule
              WHERE (type = 'DOW'  AND value = ?1)
                 OR (type = 'DOM'  AND value = ?2)
                 OR (type = 'DATE' AND value = ?3)
              ORDER BY time, state"
        ))?;
        let rows = stmt.query_map(params![dow, dom, iso], read_row)?;
        collect_records(rows)
    }
}

type RawRow = (String, String, String, String, i64, String, i64);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn collect_records(
    rows: impl Iterator<Item = rusqlite::Result<RawRow>>,
) -> Result<Vec<BoundaryRecord>> {
    let mut records = Vec::new();
    for row in rows {
        let (owner, label, rtype, value, state, time, group_id) = row?;
        let recurrence = Recurrence::from_stored(&rtype, &value)?;
        let time = NaiveTime::parse_from_str(&time, "%H:%M:%S")
            .map_err(|_| UptimeError::InvalidTime(time.clone()))?;
        records.push(BoundaryRecord {
            owner,
            label,
            recurrence,
            kind: EdgeKind::from_state(state),
            time,
            group_id,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
