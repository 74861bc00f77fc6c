use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            firstname   TEXT NOT NULL,
            lastname    TEXT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            socket_id   TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS captains (
            id                TEXT PRIMARY KEY,
            firstname         TEXT NOT NULL,
            lastname          TEXT,
            email             TEXT NOT NULL UNIQUE,
            password          TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'inactive'
                              CHECK (status IN ('active', 'inactive')),
            socket_id         TEXT,
            vehicle_color     TEXT NOT NULL,
            vehicle_plate     TEXT NOT NULL,
            vehicle_capacity  INTEGER NOT NULL CHECK (vehicle_capacity >= 1),
            vehicle_type      TEXT NOT NULL,
            location_lat      REAL,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS blacklist_tokens (
            token       TEXT PRIMARY KEY,
            expires_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_blacklist_expiry
            ON blacklist_tokens(expires_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
