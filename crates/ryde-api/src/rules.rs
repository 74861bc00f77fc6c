//! Declarative request-body rules checked before a handler touches the body.
//!
//! A rule list is static data: a dotted field path, one check, and the message
//! reported when the check fails. [`check_body`] evaluates every rule against
//! the raw JSON body and returns one [`FieldError`] per failed rule, so a
//! missing field typically reports each of its checks.
//!
//! [`parse`] is what handlers call: it runs a rule list and then reads the
//! body into its typed request, so every rejection carries the same
//! `{ "errors": [...] }` shape.

use axum::{Json, extract::rejection::JsonRejection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::ValidateEmail;

use ryde_types::validation::FieldError;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Key is present. `null` counts as present.
    Exists,
    IsString,
    /// At least `n` characters. Numbers and booleans are measured by their
    /// decimal rendering; anything else counts as empty.
    MinLength(usize),
    /// Whole number (JSON integer, integral float or integer string) in
    /// `min..=max`.
    IsInt { min: i64, max: i64 },
    /// Any JSON number.
    IsNumber,
    IsEmail,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub path: &'static str,
    pub check: Check,
    pub message: &'static str,
}

const fn rule(path: &'static str, check: Check, message: &'static str) -> Rule {
    Rule { path, check, message }
}

pub static CAPTAIN_REGISTRATION: &[Rule] = &[
    rule("fullname", Check::Exists, "Fullname is required"),
    rule("fullname.firstname", Check::Exists, "Firstname is required"),
    rule("fullname.firstname", Check::IsString, "Firstname must be a string"),
    rule("fullname.firstname", Check::MinLength(3), "Firstname must be at least 3 characters long"),
    rule("fullname.lastname", Check::Exists, "Lastname is required"),
    rule("fullname.lastname", Check::IsString, "Lastname must be a string"),
    rule("fullname.lastname", Check::MinLength(3), "Lastname must be at least 3 characters long"),
    rule("email", Check::Exists, "Email is required"),
    rule("email", Check::IsEmail, "Invalid email address"),
    rule("password", Check::Exists, "Password is required"),
    rule("password", Check::MinLength(6), "Password must be at least 6 characters long"),
    rule("vehicle.color", Check::Exists, "Vehicle color is required"),
    rule("vehicle.color", Check::IsString, "Vehicle color must be a string"),
    rule("vehicle.color", Check::MinLength(3), "Vehicle color must be at least 3 characters long"),
    rule("vehicle.plate", Check::Exists, "Vehicle plate is required"),
    rule("vehicle.plate", Check::MinLength(3), "Vehicle plate must be at least 3 characters long"),
    rule("vehicle.capacity", Check::Exists, "Vehicle capacity is required"),
    rule("vehicle.capacity", Check::IsInt { min: 1, max: u32::MAX as i64 }, "Vehicle capacity must be a number and at least 1"),
    rule("vehicle.vehicleType", Check::Exists, "Vehicle type is required"),
    rule("vehicle.vehicleType", Check::IsString, "Vehicle type must be a string"),
];

pub static USER_REGISTRATION: &[Rule] = &[
    rule("email", Check::IsEmail, "Invalid Email"),
    rule("fullname.firstname", Check::MinLength(3), "First name must be at least 3 characters long"),
    rule("password", Check::MinLength(6), "Password must be at least 6 characters long"),
];

pub static LOGIN: &[Rule] = &[
    rule("email", Check::IsEmail, "Invalid Email"),
    rule("password", Check::MinLength(6), "Password must be at least 6 characters long"),
];

pub static STATUS_UPDATE: &[Rule] = &[
    rule("status", Check::Exists, "Status is required"),
    rule("status", Check::OneOf(&["active", "inactive"]), "Status must be active or inactive"),
];

pub static LOCATION_UPDATE: &[Rule] = &[
    rule("lat", Check::Exists, "Latitude is required"),
    rule("lat", Check::IsNumber, "Latitude must be a number"),
];

/// Check `body` against `rules`, then deserialize it.
pub fn parse<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
    rules: &[Rule],
) -> Result<T, ApiError> {
    let Json(body) = body?;
    let errors = check_body(&body, rules);
    if !errors.is_empty() {
        return Err(errors.into());
    }
    serde_json::from_value(body).map_err(|e| ApiError::from(vec![FieldError::new("body", e.to_string())]))
}

pub fn check_body(body: &Value, rules: &[Rule]) -> Vec<FieldError> {
    rules
        .iter()
        .filter(|r| !passes(lookup(body, r.path), r.check))
        .map(|r| FieldError::new(r.path, r.message))
        .collect()
}

fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(body, |node, key| node.as_object()?.get(key))
}

fn passes(value: Option<&Value>, check: Check) -> bool {
    match check {
        Check::Exists => value.is_some(),
        Check::IsString => matches!(value, Some(Value::String(_))),
        Check::MinLength(n) => length_of(value) >= n,
        Check::IsInt { min, max } => whole_number(value).is_some_and(|v| (min..=max).contains(&v)),
        Check::IsNumber => matches!(value, Some(Value::Number(_))),
        Check::IsEmail => match value {
            Some(Value::String(s)) => s.validate_email(),
            _ => false,
        },
        Check::OneOf(allowed) => match value {
            Some(Value::String(s)) => allowed.contains(&s.as_str()),
            _ => false,
        },
    }
}

fn length_of(value: Option<&Value>) -> usize {
    match value {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Number(n)) => n.to_string().chars().count(),
        Some(Value::Bool(b)) => b.to_string().len(),
        _ => 0,
    }
}

fn whole_number(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_captain() -> Value {
        json!({
            "fullname": { "firstname": "Ali", "lastname": "Jones" },
            "email": "a@b.com",
            "password": "secret1",
            "vehicle": { "color": "red", "plate": "AB1", "capacity": 4, "vehicleType": "car" }
        })
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_captain_has_no_errors() {
        assert!(check_body(&valid_captain(), CAPTAIN_REGISTRATION).is_empty());
    }

    #[test]
    fn two_letter_firstname_fails_until_corrected() {
        let mut body = valid_captain();
        body["fullname"]["firstname"] = json!("Al");
        body["fullname"]["lastname"] = json!("Jo");
        let errors = check_body(&body, CAPTAIN_REGISTRATION);
        assert!(fields(&errors).contains(&"fullname.firstname"));

        body["fullname"]["firstname"] = json!("Ali");
        body["fullname"]["lastname"] = json!("Jon");
        assert!(check_body(&body, CAPTAIN_REGISTRATION).is_empty());
    }

    #[test]
    fn every_required_field_is_named_when_missing() {
        let required = [
            ("fullname", None),
            ("email", None),
            ("password", None),
            ("vehicle", Some("color")),
            ("vehicle", Some("plate")),
            ("vehicle", Some("capacity")),
            ("vehicle", Some("vehicleType")),
        ];
        for (parent, child) in required {
            let mut body = valid_captain();
            let path = match child {
                Some(c) => {
                    body[parent].as_object_mut().unwrap().remove(c);
                    format!("{}.{}", parent, c)
                }
                None => {
                    body.as_object_mut().unwrap().remove(parent);
                    parent.to_string()
                }
            };
            let errors = check_body(&body, CAPTAIN_REGISTRATION);
            assert!(fields(&errors).contains(&path.as_str()), "no error for {}", path);
        }
    }

    #[test]
    fn missing_field_reports_each_failed_check() {
        let mut body = valid_captain();
        body["vehicle"].as_object_mut().unwrap().remove("color");
        let errors = check_body(&body, CAPTAIN_REGISTRATION);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Vehicle color is required",
                "Vehicle color must be a string",
                "Vehicle color must be at least 3 characters long",
            ]
        );
    }

    #[test]
    fn short_strings_fail_only_their_own_field() {
        let mut body = valid_captain();
        body["vehicle"]["plate"] = json!("A1");
        let errors = check_body(&body, CAPTAIN_REGISTRATION);
        assert_eq!(fields(&errors), vec!["vehicle.plate"]);

        let mut body = valid_captain();
        body["password"] = json!("12345");
        let errors = check_body(&body, CAPTAIN_REGISTRATION);
        assert_eq!(fields(&errors), vec!["password"]);
    }

    #[test]
    fn capacity_must_be_whole_and_positive() {
        for bad in [json!(0), json!(-2), json!(1.5), json!("two"), json!(null), json!([4]), json!(5_000_000_000u64)] {
            let mut body = valid_captain();
            body["vehicle"]["capacity"] = bad.clone();
            let errors = check_body(&body, CAPTAIN_REGISTRATION);
            assert_eq!(fields(&errors), vec!["vehicle.capacity"], "accepted {}", bad);
        }
        for good in [json!(1), json!(7.0), json!("3")] {
            let mut body = valid_captain();
            body["vehicle"]["capacity"] = good;
            assert!(check_body(&body, CAPTAIN_REGISTRATION).is_empty());
        }
    }

    #[test]
    fn non_string_values_fail_string_checks() {
        let mut body = valid_captain();
        body["vehicle"]["vehicleType"] = json!(3);
        body["email"] = json!(42);
        let errors = check_body(&body, CAPTAIN_REGISTRATION);
        assert_eq!(fields(&errors), vec!["email", "vehicle.vehicleType"]);
    }

    #[test]
    fn null_exists_but_is_not_a_string() {
        let mut body = valid_captain();
        body["fullname"]["lastname"] = Value::Null;
        let messages: Vec<String> = check_body(&body, CAPTAIN_REGISTRATION)
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            messages,
            vec!["Lastname must be a string", "Lastname must be at least 3 characters long"]
        );
    }

    #[test]
    fn checking_does_not_touch_the_body() {
        let body = json!({ "email": "bad" });
        let before = body.clone();
        let _ = check_body(&body, CAPTAIN_REGISTRATION);
        assert_eq!(body, before);
    }

    #[test]
    fn login_rules() {
        assert!(check_body(&json!({ "email": "a@b.com", "password": "secret1" }), LOGIN).is_empty());
        let errors = check_body(&json!({ "email": "nope", "password": "x" }), LOGIN);
        assert_eq!(fields(&errors), vec!["email", "password"]);
    }

    #[test]
    fn status_must_be_a_known_value() {
        assert!(check_body(&json!({ "status": "active" }), STATUS_UPDATE).is_empty());
        assert!(check_body(&json!({ "status": "inactive" }), STATUS_UPDATE).is_empty());
        for bad in [json!({ "status": "busy" }), json!({ "status": 1 }), json!({})] {
            let errors = check_body(&bad, STATUS_UPDATE);
            assert!(fields(&errors).iter().all(|f| *f == "status"), "{}", bad);
            assert!(!errors.is_empty(), "accepted {}", bad);
        }
    }

    #[test]
    fn latitude_must_be_a_number() {
        assert!(check_body(&json!({ "lat": 31 }), LOCATION_UPDATE).is_empty());
        assert!(check_body(&json!({ "lat": -12.5 }), LOCATION_UPDATE).is_empty());
        let errors = check_body(&json!({ "lat": "north" }), LOCATION_UPDATE);
        assert_eq!(fields(&errors), vec!["lat"]);
    }

    #[test]
    fn parse_reports_typed_failures_as_field_errors() {
        use ryde_types::api::UpdateStatusRequest;

        let ok: UpdateStatusRequest = parse(Ok(Json(json!({ "status": "active" }))), STATUS_UPDATE).unwrap();
        assert_eq!(ok.status.as_str(), "active");

        // No rules, so the failure comes from deserialization.
        let err = parse::<UpdateStatusRequest>(Ok(Json(json!({ "status": "busy" }))), &[]).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("body")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn user_registration_allows_missing_lastname() {
        let body = json!({
            "fullname": { "firstname": "Sam" },
            "email": "sam@x.io",
            "password": "secret1"
        });
        assert!(check_body(&body, USER_REGISTRATION).is_empty());
    }
}
