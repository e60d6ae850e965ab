use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{PurchaseForm, PurchaseRequest};

// One `@` with something on each side; `user@localhost` is accepted.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email pattern"));
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("valid name pattern"));
// ASCII digits only: `\d` would also accept other scripts' digits.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone pattern"));
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid card pattern"));
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid expiry pattern"));
static SECURITY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("valid security code pattern"));

const MAX_TICKETS: i64 = 10;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Field name to message mapping returned to clients.
pub fn to_details(issues: &[ValidationIssue]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for issue in issues {
        map.insert(
            issue.field.clone(),
            serde_json::Value::String(issue.message.clone()),
        );
    }
    serde_json::Value::Object(map)
}

/// Reads a form from a JSON object.
///
/// A value of the wrong JSON type is reported under its own field; only
/// failures that cannot be tied to one field (duplicate names) fall back to
/// a `body` issue.
pub fn read_form(body: &Value) -> Result<PurchaseForm, Vec<ValidationIssue>> {
    let err = match PurchaseForm::deserialize(body) {
        Ok(form) => return Ok(form),
        Err(err) => err,
    };

    let mut issues = Vec::new();
    if let Value::Object(fields) = body {
        for (key, value) in fields {
            let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            if PurchaseForm::deserialize(&single).is_err() {
                issues.push(type_issue(key));
            }
        }
    }
    if issues.is_empty() {
        issues.push(ValidationIssue::new("body", "type", err.to_string()));
    }
    Err(issues)
}

fn type_issue(key: &str) -> ValidationIssue {
    let field = match key {
        "concertId" => "eventId",
        "name" => "fullName",
        "creditCard" => "cardNumber",
        "expiration" => "expiry",
        "postalCode" => "postal",
        other => other,
    };
    let expected = match field {
        "eventId" | "quantity" => "a whole number",
        _ => "text",
    };
    ValidationIssue::new(
        field,
        "type",
        format!("The value for {field} must be {expected}."),
    )
}

/// Collects issues for one form. Each check records at most one issue for
/// its field and yields the accepted value otherwise.
struct Checker {
    issues: Vec<ValidationIssue>,
}

/// Rules for a single text field, applied in declaration order.
struct TextRule {
    field: &'static str,
    required: &'static str,
    length: Option<(usize, usize, &'static str)>,
    format: Option<(&'static Regex, &'static str)>,
}

impl Checker {
    fn fail(&mut self, field: &str, code: &str, message: &str) {
        self.issues.push(ValidationIssue::new(field, code, message));
    }

    fn text(&mut self, value: Option<String>, rule: TextRule) -> Option<String> {
        let value = match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.fail(rule.field, "required", rule.required);
                return None;
            }
        };

        if let Some((min, max, message)) = rule.length {
            let len = value.chars().count();
            if len < min || len > max {
                self.fail(rule.field, "length", message);
                return None;
            }
        }

        if let Some((pattern, message)) = rule.format {
            if !pattern.is_match(&value) {
                self.fail(rule.field, "format", message);
                return None;
            }
        }

        Some(value)
    }

    fn number<T: TryFrom<i64>>(
        &mut self,
        value: Option<i64>,
        field: &'static str,
        (min, max): (i64, i64),
        required: &'static str,
        range: &'static str,
    ) -> Option<T> {
        let Some(value) = value else {
            self.fail(field, "required", required);
            return None;
        };
        if value < min || value > max {
            self.fail(field, "range", range);
            return None;
        }
        match T::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.fail(field, "range", range);
                None
            }
        }
    }
}

/// Applies every field constraint to `form`.
///
/// All fields are checked before returning so the caller gets the full list
/// of problems in one response.
pub fn validate_purchase(form: PurchaseForm) -> Result<PurchaseRequest, Vec<ValidationIssue>> {
    let mut c = Checker { issues: Vec::new() };

    let event_id = c.number::<u32>(
        form.event_id,
        "eventId",
        (1, i64::from(u32::MAX)),
        "Concert identifier is necessary.",
        "Concert ID must be a positive value.",
    );
    let email = c.text(
        form.email,
        TextRule {
            field: "email",
            required: "Please enter a valid email address.",
            length: None,
            format: Some((&*EMAIL, "The email provided is not valid.")),
        },
    );
    let full_name = c.text(
        form.full_name,
        TextRule {
            field: "fullName",
            required: "Name of the buyer is required.",
            length: Some((2, 100, "Name must be between 2 and 100 characters.")),
            format: Some((&*NAME, "Name should only include alphabetic characters.")),
        },
    );
    let phone = c.text(
        form.phone,
        TextRule {
            field: "phone",
            required: "Please provide a phone number.",
            length: None,
            format: Some((&*PHONE, "Phone number should contain exactly 10 digits.")),
        },
    );
    let quantity = c.number::<u8>(
        form.quantity,
        "quantity",
        (1, MAX_TICKETS),
        "The number of tickets is required.",
        "You can only purchase between 1 and 10 tickets.",
    );
    let card_number = c.text(
        form.card_number,
        TextRule {
            field: "cardNumber",
            required: "Credit card number is mandatory.",
            length: None,
            format: Some((&*CARD_NUMBER, "Credit card number must be exactly 12 digits.")),
        },
    );
    let expiry = c.text(
        form.expiry,
        TextRule {
            field: "expiry",
            required: "Expiration date is mandatory.",
            length: None,
            format: Some((&*EXPIRY, "Expiration date should be in MM/YY format.")),
        },
    );
    let security_code = c.text(
        form.security_code,
        TextRule {
            field: "securityCode",
            required: "Please provide the card's security code.",
            length: Some((0, 3, "Security code must be exactly 3 digits.")),
            format: Some((
                &*SECURITY_CODE,
                "Security code must consist of 3 numeric digits.",
            )),
        },
    );
    let address = c.text(
        form.address,
        TextRule {
            field: "address",
            required: "Shipping address is necessary.",
            length: Some((0, 200, "Address cannot exceed 200 characters.")),
            format: None,
        },
    );
    let city = c.text(
        form.city,
        TextRule {
            field: "city",
            required: "City name is required.",
            length: Some((0, 100, "City name must not exceed 100 characters.")),
            format: None,
        },
    );
    let province = c.text(
        form.province,
        TextRule {
            field: "province",
            required: "Please provide a valid state or province.",
            length: Some((0, 50, "State/Province name cannot exceed 50 characters.")),
            format: None,
        },
    );
    let postal = c.text(
        form.postal,
        TextRule {
            field: "postal",
            required: "Postal code is mandatory.",
            length: Some((6, 6, "Postal code must be exactly 6 characters long.")),
            format: None,
        },
    );
    let country = c.text(
        form.country,
        TextRule {
            field: "country",
            required: "Please mention the country.",
            length: Some((0, 100, "Country name cannot exceed 100 characters.")),
            format: None,
        },
    );

    match (
        event_id,
        email,
        full_name,
        phone,
        quantity,
        card_number,
        expiry,
        security_code,
        address,
        city,
        province,
        postal,
        country,
    ) {
        (
            Some(event_id),
            Some(email),
            Some(full_name),
            Some(phone),
            Some(quantity),
            Some(card_number),
            Some(expiry),
            Some(security_code),
            Some(address),
            Some(city),
            Some(province),
            Some(postal),
            Some(country),
        ) => Ok(PurchaseRequest {
            event_id,
            email,
            full_name,
            phone,
            quantity,
            card_number,
            expiry,
            security_code,
            address,
            city,
            province,
            postal,
            country,
        }),
        _ => Err(c.issues),
    }
}
