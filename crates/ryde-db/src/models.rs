//! Database row types. These map directly to SQLite rows.
//! Conversion into the shared ryde-types records happens here so the query
//! layer never hands out half-parsed ids or statuses.

use ryde_types::models::{Captain, CaptainStatus, FullName, Location, User, Vehicle};
use uuid::Uuid;

use crate::{DbError, Result};

pub struct UserRow {
    pub id: String,
    pub firstname: String,
    pub lastname: Option<String>,
    pub email: String,
    pub socket_id: Option<String>,
}

pub struct CaptainRow {
    pub id: String,
    pub firstname: String,
    pub lastname: Option<String>,
    pub email: String,
    pub status: String,
    pub socket_id: Option<String>,
    pub vehicle_color: String,
    pub vehicle_plate: String,
    pub vehicle_capacity: u32,
    pub vehicle_type: String,
    pub location_lat: Option<f64>,
}

/// An account together with its stored password hash. Only produced by the
/// explicit credential lookups used at login.
pub struct Credentials<T> {
    pub account: T,
    pub password_hash: String,
}

fn parse_id(id: &str) -> Result<Uuid> {
    id.parse()
        .map_err(|e| DbError::Corrupt(format!("bad id '{}': {}", id, e)))
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            fullname: FullName {
                firstname: self.firstname,
                lastname: self.lastname,
            },
            email: self.email,
            socket_id: self.socket_id,
        })
    }
}

impl CaptainRow {
    pub fn into_captain(self) -> Result<Captain> {
        let status: CaptainStatus = self
            .status
            .parse()
            .map_err(|e| DbError::Corrupt(format!("captain {}: {}", self.id, e)))?;

        Ok(Captain {
            id: parse_id(&self.id)?,
            fullname: FullName {
                firstname: self.firstname,
                lastname: self.lastname,
            },
            email: self.email,
            status,
            socket_id: self.socket_id,
            vehicle: Vehicle {
                color: self.vehicle_color,
                plate: self.vehicle_plate,
                capacity: self.vehicle_capacity,
                vehicle_type: self.vehicle_type,
            },
            location: Location {
                lat: self.location_lat,
            },
        })
    }
}
