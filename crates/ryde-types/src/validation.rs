//! Field-level validation of records before they are persisted.
//!
//! Each record type implements [`Validate`] by hand. Every rule is checked and
//! all failures are returned together, one [`FieldError`] per offending path.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{FullName, NewCaptain, NewUser, Vehicle};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+@.+\..+").expect("email pattern is valid"));

/// A single violated rule, labelled with the dotted path of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    /// True when any error is reported for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Required string with a minimum length. Empty counts as missing.
fn required_min(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.is_empty() {
        errors.push(field, &format!("{} is required", field));
    } else if char_len(value) < min {
        errors.push(field, message);
    }
}

fn optional_min(errors: &mut ValidationErrors, field: &str, value: Option<&str>, min: usize, message: &str) {
    if let Some(v) = value {
        if char_len(v) < min {
            errors.push(field, message);
        }
    }
}

fn check_fullname(errors: &mut ValidationErrors, fullname: &FullName, first_msg: &str, last_msg: &str) {
    required_min(errors, "fullname.firstname", &fullname.firstname, 3, first_msg);
    optional_min(errors, "fullname.lastname", fullname.lastname.as_deref(), 3, last_msg);
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_fullname(
            &mut errors,
            &self.fullname,
            "first name must be 3 character long",
            "last name must be 3 character long",
        );
        required_min(&mut errors, "email", &self.email, 5, "Email must be 5 characters long");
        if self.password_hash.is_empty() {
            errors.push("password", "password is required");
        }

        errors.into_result()
    }
}

fn check_vehicle(errors: &mut ValidationErrors, vehicle: &Vehicle) {
    required_min(errors, "vehicle.color", &vehicle.color, 3, "color must be 3 char long");
    required_min(errors, "vehicle.plate", &vehicle.plate, 3, "plate must be 3 char long");
    // Numeric minimum, same as the registration route's rule.
    if vehicle.capacity < 1 {
        errors.push("vehicle.capacity", "capacity must be at least 1");
    }
    if vehicle.vehicle_type.is_empty() {
        errors.push("vehicle.vehicleType", "vehicle.vehicleType is required");
    }
}

impl Validate for NewCaptain {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_fullname(
            &mut errors,
            &self.fullname,
            "firstname must be 3 character long",
            "lastname must be 3 character long",
        );
        if self.email.is_empty() {
            errors.push("email", "email is required");
        } else if !EMAIL_SHAPE.is_match(&self.email) {
            errors.push("email", "Please fill a valid email address");
        }
        // The stored value is the hash; the plaintext minimum of 6 is a
        // registration route rule.
        if self.password_hash.is_empty() {
            errors.push("password", "password is required");
        }
        check_vehicle(&mut errors, &self.vehicle);

        errors.into_result()
    }
}
