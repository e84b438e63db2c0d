use anyhow::Result;
use rusqlite::Connection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS days (
            date       TEXT PRIMARY KEY,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id             TEXT PRIMARY KEY,
            date           TEXT NOT NULL REFERENCES days(date),
            slot           TEXT NOT NULL,
            position       INTEGER NOT NULL,
            code           TEXT,
            name           TEXT,
            brand          TEXT,
            image_url      TEXT,
            calories       REAL NOT NULL DEFAULT 0,
            protein        REAL NOT NULL DEFAULT 0,
            carbs          REAL NOT NULL DEFAULT 0,
            fat            REAL NOT NULL DEFAULT 0,
            fiber          REAL NOT NULL DEFAULT 0,
            quantity_grams REAL,
            timestamp      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_entries_slot ON entries(date, slot, position);",
    )?;
    Ok(())
}
