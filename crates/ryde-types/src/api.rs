use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::models::{Captain, CaptainStatus, FullName, User, Vehicle};

// -- JWT Claims --

/// Claims carried by a rider token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a captain token. Email and status are embedded so
/// downstream services can route on availability without a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptainClaims {
    pub sub: Uuid,
    pub email: String,
    pub status: CaptainStatus,
    pub iat: i64,
    pub exp: i64,
}

// -- Request bodies --
//
// Unknown keys are ignored. Fields the route rules measure by length without
// requiring a string (names, passwords, plates) take numbers and booleans as
// their text.

/// Name as submitted at registration.
#[derive(Debug, Deserialize)]
pub struct FullNameRequest {
    #[serde(deserialize_with = "text")]
    pub firstname: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub lastname: Option<String>,
}

impl From<FullNameRequest> for FullName {
    fn from(req: FullNameRequest) -> Self {
        Self {
            firstname: req.firstname,
            lastname: req.lastname,
        }
    }
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub fullname: FullNameRequest,
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserAuthResponse {
    pub token: String,
    pub user: User,
}

// -- Captains --

#[derive(Debug, Deserialize)]
pub struct RegisterCaptainRequest {
    pub fullname: FullNameRequest,
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
    pub vehicle: VehicleRequest,
}

/// Vehicle as submitted at registration. `capacity` may arrive as a JSON
/// number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    pub color: String,
    #[serde(deserialize_with = "text")]
    pub plate: String,
    #[serde(deserialize_with = "whole_number")]
    pub capacity: u32,
    pub vehicle_type: String,
}

impl From<VehicleRequest> for Vehicle {
    fn from(req: VehicleRequest) -> Self {
        Self {
            color: req.color,
            plate: req.plate,
            capacity: req.capacity,
            vehicle_type: req.vehicle_type,
        }
    }
}

fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => Ok(f as u32),
        Raw::Float(f) => Err(de::Error::custom(format!("{} is not a whole number", f))),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(f) => format!("{:?}", f),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(Scalar::into_text))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptainAuthResponse {
    pub token: String,
    pub captain: Captain,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: CaptainStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub lat: f64,
}

// -- Shared --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(capacity: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "color": "red", "plate": "AB1", "capacity": capacity, "vehicleType": "car" })
    }

    #[test]
    fn capacity_accepts_numbers_and_numeric_strings() {
        let v: VehicleRequest = serde_json::from_value(vehicle(serde_json::json!(4))).unwrap();
        assert_eq!(v.capacity, 4);
        let v: VehicleRequest = serde_json::from_value(vehicle(serde_json::json!("6"))).unwrap();
        assert_eq!(v.capacity, 6);
        let v: VehicleRequest = serde_json::from_value(vehicle(serde_json::json!(3.0))).unwrap();
        assert_eq!(v.capacity, 3);
    }

    #[test]
    fn capacity_rejects_fractions_and_negatives() {
        assert!(serde_json::from_value::<VehicleRequest>(vehicle(serde_json::json!(2.5))).is_err());
        assert!(serde_json::from_value::<VehicleRequest>(vehicle(serde_json::json!(-1))).is_err());
        assert!(serde_json::from_value::<VehicleRequest>(vehicle(serde_json::json!("four"))).is_err());
        assert!(serde_json::from_value::<VehicleRequest>(vehicle(serde_json::json!(5_000_000_000u64))).is_err());
    }

    #[test]
    fn numeric_plate_and_password_are_taken_as_text() {
        let body = serde_json::json!({
            "fullname": { "firstname": "Ali", "lastname": 12345 },
            "email": "a@b.com",
            "password": 1234567,
            "phone": "555",
            "vehicle": { "color": "red", "plate": 12345, "capacity": 4, "vehicleType": "car", "year": 2020 }
        });
        let req: RegisterCaptainRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.password, "1234567");
        assert_eq!(req.vehicle.plate, "12345");
        assert_eq!(req.fullname.lastname.as_deref(), Some("12345"));
    }

    #[test]
    fn structured_values_are_not_text() {
        let body = serde_json::json!({ "email": "a@b.com", "password": { "x": 1 } });
        assert!(serde_json::from_value::<LoginRequest>(body).is_err());
    }
}
