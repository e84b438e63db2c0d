use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{OptionalExtension, Row, params};

use crate::error::DietError;
use crate::models::entry::{DayLog, DiaryEntry, EntryPatch, MealSlot};

use super::{Database, DiaryStore};

const ENTRY_COLUMNS: &str = "id, slot, code, name, brand, image_url, calories, protein, carbs, \
     fat, fiber, quantity_grams, timestamp";

struct EntryRow {
    id: String,
    slot: String,
    code: Option<String>,
    name: Option<String>,
    brand: Option<String>,
    image_url: Option<String>,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    quantity_grams: Option<f64>,
    timestamp: String,
}

impl EntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slot: row.get(1)?,
            code: row.get(2)?,
            name: row.get(3)?,
            brand: row.get(4)?,
            image_url: row.get(5)?,
            calories: row.get(6)?,
            protein: row.get(7)?,
            carbs: row.get(8)?,
            fat: row.get(9)?,
            fiber: row.get(10)?,
            quantity_grams: row.get(11)?,
            timestamp: row.get(12)?,
        })
    }
}

fn row_to_entry(r: EntryRow) -> Result<(MealSlot, DiaryEntry), DietError> {
    let slot: MealSlot = r
        .slot
        .parse()
        .map_err(|e: anyhow::Error| DietError::Storage(e.to_string()))?;
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&r.timestamp)
        .map_err(|e| DietError::Storage(format!("bad timestamp {:?}: {}", r.timestamp, e)))?
        .with_timezone(&Utc);
    Ok((
        slot,
        DiaryEntry {
            id: r.id,
            code: r.code,
            name: r.name,
            brand: r.brand,
            image_url: r.image_url,
            calories: r.calories,
            protein: r.protein,
            carbs: r.carbs,
            fat: r.fat,
            fiber: r.fiber,
            quantity_grams: r.quantity_grams,
            timestamp,
        },
    ))
}

impl DiaryStore for Database {
    fn append_entry(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        entry: &DiaryEntry,
    ) -> Result<usize, DietError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO days (date, created_at) VALUES (?1, ?2)",
            params![date.to_string(), Utc::now().to_rfc3339()],
        )?;
        let index: i64 = tx.query_row(
            "SELECT COUNT(*) FROM entries WHERE date = ?1 AND slot = ?2",
            params![date.to_string(), slot.to_string()],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO entries (id, date, slot, position, code, name, brand, image_url,
                                  calories, protein, carbs, fat, fiber, quantity_grams, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                entry.id,
                date.to_string(),
                slot.to_string(),
                index,
                entry.code,
                entry.name,
                entry.brand,
                entry.image_url,
                entry.calories,
                entry.protein,
                entry.carbs,
                entry.fat,
                entry.fiber,
                entry.quantity_grams,
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(index as usize)
    }

    fn update_entry(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        index: usize,
        patch: &EntryPatch,
    ) -> Result<(), DietError> {
        let count = self.conn.execute(
            "UPDATE entries SET
                calories       = COALESCE(?4, calories),
                protein        = COALESCE(?5, protein),
                carbs          = COALESCE(?6, carbs),
                fat            = COALESCE(?7, fat),
                fiber          = COALESCE(?8, fiber),
                quantity_grams = COALESCE(?9, quantity_grams)
             WHERE date = ?1 AND slot = ?2 AND position = ?3",
            params![
                date.to_string(),
                slot.to_string(),
                index as i64,
                patch.calories,
                patch.protein,
                patch.carbs,
                patch.fat,
                patch.fiber,
                patch.quantity_grams,
            ],
        )?;
        if count == 0 {
            return Err(DietError::EntryNotFound { date, slot, index });
        }
        Ok(())
    }

    fn delete_entry(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        index: usize,
    ) -> Result<(), DietError> {
        let tx = self.conn.unchecked_transaction()?;
        let count = tx.execute(
            "DELETE FROM entries WHERE date = ?1 AND slot = ?2 AND position = ?3",
            params![date.to_string(), slot.to_string(), index as i64],
        )?;
        if count == 0 {
            return Err(DietError::EntryNotFound { date, slot, index });
        }
        tx.execute(
            "UPDATE entries SET position = position - 1
             WHERE date = ?1 AND slot = ?2 AND position > ?3",
            params![date.to_string(), slot.to_string(), index as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn day_log(&self, date: NaiveDate) -> Result<Option<DayLog>, DietError> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT date FROM days WHERE date = ?1",
                params![date.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM entries WHERE date = ?1 ORDER BY slot, position",
            ENTRY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![date.to_string()], EntryRow::from_row)?;

        let mut log = DayLog::new(date);
        for row in rows {
            let (slot, entry) = row_to_entry(row?)?;
            log.meals.slot_mut(slot).push(entry);
        }
        Ok(Some(log))
    }

    fn month_logs(&self, year: i32, month: u32) -> Result<Vec<DayLog>, DietError> {
        let prefix = format!("{:04}-{:02}-%", year, month);
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM days WHERE date LIKE ?1 ORDER BY date")?;
        let dates = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;

        let mut logs = Vec::new();
        for d in dates {
            let d = d?;
            let date: NaiveDate = d
                .parse()
                .map_err(|e| DietError::Storage(format!("bad date {:?}: {}", d, e)))?;
            if let Some(log) = self.day_log(date)? {
                logs.push(log);
            }
        }
        Ok(logs)
    }
}
