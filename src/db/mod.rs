mod entries;
mod migrate;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::error::DietError;
use crate::models::entry::{DayLog, DiaryEntry, EntryPatch, MealSlot};

/// Diary backend. Entries are addressed by day, slot and position within the
/// slot; deleting an entry shifts later positions down by one.
pub trait DiaryStore: Send {
    /// Append at the end of the slot, creating the day if needed. Returns the new index.
    fn append_entry(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        entry: &DiaryEntry,
    ) -> Result<usize, DietError>;

    /// Merge-patch the entry at `index`; unset patch fields are left alone.
    fn update_entry(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        index: usize,
        patch: &EntryPatch,
    ) -> Result<(), DietError>;

    fn delete_entry(&self, date: NaiveDate, slot: MealSlot, index: usize)
    -> Result<(), DietError>;

    fn day_log(&self, date: NaiveDate) -> Result<Option<DayLog>, DietError>;

    /// One log per day of the month that has been created.
    fn month_logs(&self, year: i32, month: u32) -> Result<Vec<DayLog>, DietError>;
}

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .mode(0o600)
                    .open(path)?;
            } else {
                let mut perms = fs::metadata(path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrate::run(&conn)?;
        Ok(Self { conn })
    }
}
