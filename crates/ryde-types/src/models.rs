use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullName {
    pub firstname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

/// Rider account as returned to clients. The password hash is never part of
/// this type; it only leaves the database through an explicit credentials query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub fullname: FullName,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

/// Captain availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptainStatus {
    Active,
    #[default]
    Inactive,
}

impl CaptainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CaptainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown captain status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CaptainStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub color: String,
    pub plate: String,
    pub capacity: u32,
    /// Free-form; no fixed set of vehicle types is enforced.
    pub vehicle_type: String,
}

/// Single-axis position. There is no longitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captain {
    pub id: Uuid,
    pub fullname: FullName,
    pub email: String,
    #[serde(default)]
    pub status: CaptainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub location: Location,
}

// -- Records about to be persisted --

/// A user record ready for insertion, carrying the already-hashed password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: FullName,
    pub email: String,
    pub password_hash: String,
}

/// A captain record ready for insertion. Status starts out `inactive` and
/// location empty.
#[derive(Debug, Clone)]
pub struct NewCaptain {
    pub fullname: FullName,
    pub email: String,
    pub password_hash: String,
    pub status: CaptainStatus,
    pub vehicle: Vehicle,
    pub location: Location,
}

impl NewCaptain {
    pub fn new(fullname: FullName, email: String, password_hash: String, vehicle: Vehicle) -> Self {
        Self {
            fullname,
            email,
            password_hash,
            status: CaptainStatus::default(),
            vehicle,
            location: Location::default(),
        }
    }
}
