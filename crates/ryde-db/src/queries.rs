use chrono::Utc;
use rusqlite::{Connection, Row};
use tracing::debug;
use uuid::Uuid;

use ryde_types::models::{Captain, CaptainStatus, NewCaptain, NewUser, User};

use crate::models::{CaptainRow, Credentials, UserRow};
use crate::{Database, DbError, Result};

const USER_COLUMNS: &str = "id, firstname, lastname, email, socket_id";

const CAPTAIN_COLUMNS: &str = "id, firstname, lastname, email, status, socket_id, \
     vehicle_color, vehicle_plate, vehicle_capacity, vehicle_type, location_lat";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let id = Uuid::new_v4();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, firstname, lastname, email, password) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    id.to_string(),
                    user.fullname.firstname,
                    user.fullname.lastname,
                    user.email,
                    user.password_hash,
                ],
            )?;
            Ok(())
        })?;
        debug!("Created user {}", id);

        Ok(User {
            id,
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            socket_id: None,
        })
    }

    /// Default projection: never includes the password hash.
    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
            query_one(conn, &sql, &id.to_string(), user_row)?
                .map(UserRow::into_user)
                .transpose()
        })
    }

    pub fn get_user_credentials(&self, email: &str) -> Result<Option<Credentials<User>>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {}, password FROM users WHERE email = ?1", USER_COLUMNS);
            let found = query_one(conn, &sql, email, |row| Ok((user_row(row)?, row.get::<_, String>(5)?)))?;
            found
                .map(|(row, password_hash)| {
                    Ok(Credentials {
                        account: row.into_user()?,
                        password_hash,
                    })
                })
                .transpose()
        })
    }

    // -- Captains --

    pub fn create_captain(&self, captain: &NewCaptain) -> Result<Captain> {
        let id = Uuid::new_v4();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO captains (id, firstname, lastname, email, password, status,
                    vehicle_color, vehicle_plate, vehicle_capacity, vehicle_type, location_lat)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    id.to_string(),
                    captain.fullname.firstname,
                    captain.fullname.lastname,
                    captain.email,
                    captain.password_hash,
                    captain.status.as_str(),
                    captain.vehicle.color,
                    captain.vehicle.plate,
                    captain.vehicle.capacity,
                    captain.vehicle.vehicle_type,
                    captain.location.lat,
                ],
            )?;
            Ok(())
        })?;
        debug!("Created captain {}", id);

        Ok(Captain {
            id,
            fullname: captain.fullname.clone(),
            email: captain.email.clone(),
            status: captain.status,
            socket_id: None,
            vehicle: captain.vehicle.clone(),
            location: captain.location,
        })
    }

    pub fn get_captain_by_id(&self, id: Uuid) -> Result<Option<Captain>> {
        self.with_conn(|conn| query_captain_by_id(conn, id))
    }

    pub fn get_captain_credentials(&self, email: &str) -> Result<Option<Credentials<Captain>>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {}, password FROM captains WHERE email = ?1", CAPTAIN_COLUMNS);
            let found = query_one(conn, &sql, email, |row| Ok((captain_row(row)?, row.get::<_, String>(11)?)))?;
            found
                .map(|(row, password_hash)| {
                    Ok(Credentials {
                        account: row.into_captain()?,
                        password_hash,
                    })
                })
                .transpose()
        })
    }

    /// Returns the updated captain, or `None` if no such captain exists.
    pub fn set_captain_status(&self, id: Uuid, status: CaptainStatus) -> Result<Option<Captain>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE captains SET status = ?1 WHERE id = ?2",
                (status.as_str(), id.to_string()),
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_captain_by_id(conn, id)
        })
    }

    pub fn set_captain_location(&self, id: Uuid, lat: f64) -> Result<Option<Captain>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE captains SET location_lat = ?1 WHERE id = ?2",
                (lat, id.to_string()),
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_captain_by_id(conn, id)
        })
    }

    // -- Token blacklist --

    /// Blacklist a token until its own expiry. Entries that have already
    /// expired are purged on the way.
    pub fn blacklist_token(&self, token: &str, expires_at: i64) -> Result<()> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            let purged = conn.execute("DELETE FROM blacklist_tokens WHERE expires_at <= ?1", [now])?;
            if purged > 0 {
                debug!("Purged {} expired blacklisted tokens", purged);
            }
            conn.execute(
                "INSERT OR IGNORE INTO blacklist_tokens (token, expires_at) VALUES (?1, ?2)",
                (token, expires_at),
            )?;
            Ok(())
        })
    }

    pub fn is_token_blacklisted(&self, token: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let hit = query_one(
                conn,
                "SELECT 1 FROM blacklist_tokens WHERE token = ?1",
                token,
                |row| row.get::<_, i64>(0),
            )?;
            Ok(hit.is_some())
        })
    }
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        socket_id: row.get(4)?,
    })
}

fn captain_row(row: &Row<'_>) -> rusqlite::Result<CaptainRow> {
    Ok(CaptainRow {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        status: row.get(4)?,
        socket_id: row.get(5)?,
        vehicle_color: row.get(6)?,
        vehicle_plate: row.get(7)?,
        vehicle_capacity: row.get(8)?,
        vehicle_type: row.get(9)?,
        location_lat: row.get(10)?,
    })
}

fn query_captain_by_id(conn: &Connection, id: Uuid) -> Result<Option<Captain>> {
    let sql = format!("SELECT {} FROM captains WHERE id = ?1", CAPTAIN_COLUMNS);
    query_one(conn, &sql, &id.to_string(), captain_row)?
        .map(CaptainRow::into_captain)
        .transpose()
}

/// Run a single-parameter query expected to match at most one row.
fn query_one<T, F>(conn: &Connection, sql: &str, param: &str, map: F) -> Result<Option<T>>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    match stmt.query_row([param], map) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::from(e)),
    }
}
