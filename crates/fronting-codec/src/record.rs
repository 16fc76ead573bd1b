//! Officer record carried inside the fronting payload.
//!
//! The wire form is a loosely typed JSON object produced by the host
//! application. Only `name` and `nippos` are required; everything else is
//! optional and unknown keys are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PayloadError;

/// Wire key for the officer's display name.
pub const NAME_KEY: &str = "name";
/// Wire key for the officer code ("nippos").
pub const IDENTIFIER_KEY: &str = "nippos";
/// Wire key for the officer's account number.
pub const ACCOUNT_NUMBER_KEY: &str = "account_no";
/// Wire key for the branch group name.
pub const BRANCH_GROUP_NAME_KEY: &str = "branch_group_name";
/// Wire key for the branch name.
pub const BRANCH_NAME_KEY: &str = "branch_name";
/// Wire key for the officer's role.
pub const ROLE_KEY: &str = "role";

/// Officer details recovered from a fronting payload.
///
/// ## Invariants
/// - `name` and `identifier` are non-empty once trimmed.
/// - Optional fields are `None` rather than empty strings.
/// - `retrieved_at` records when the codec produced the record; it never
///   travels on the wire.
///
/// The serde form is the session-storage shape (camelCase, with
/// `retrievedAt`); use [`OfficerRecord::to_wire_json`] for the producer shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerRecord {
    /// Officer display name.
    pub name: String,
    /// Unique officer code.
    pub identifier: String,
    /// Account number, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Branch group name, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_group_name: Option<String>,
    /// Branch name, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    /// Officer role, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Moment the codec decoded this record.
    pub retrieved_at: DateTime<Utc>,
}

impl OfficerRecord {
    /// Validate a parsed wire value and stamp it with `retrieved_at`.
    ///
    /// Strings are trimmed. JSON numbers are accepted for any field and kept
    /// in their JSON text form, since officer codes sometimes arrive unquoted.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotAnObject`] for non-object JSON and
    /// [`PayloadError::MissingField`] when `name` or `nippos` is absent or
    /// blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use fronting_codec::OfficerRecord;
    /// use serde_json::json;
    ///
    /// let value = json!({"nippos": 991406965, "name": " CEPI ", "role": ""});
    /// let record = OfficerRecord::from_wire(&value, Utc::now()).expect("valid payload");
    /// assert_eq!(record.identifier, "991406965");
    /// assert_eq!(record.name, "CEPI");
    /// assert!(record.role.is_none());
    /// ```
    pub fn from_wire(value: &Value, retrieved_at: DateTime<Utc>) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
        Ok(Self {
            name: required(object, NAME_KEY)?,
            identifier: required(object, IDENTIFIER_KEY)?,
            account_number: optional(object, ACCOUNT_NUMBER_KEY),
            branch_group_name: optional(object, BRANCH_GROUP_NAME_KEY),
            branch_name: optional(object, BRANCH_NAME_KEY),
            role: optional(object, ROLE_KEY),
            retrieved_at,
        })
    }

    /// Render the producer's wire object, without `retrieved_at`.
    #[must_use]
    pub fn to_wire_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(IDENTIFIER_KEY.to_owned(), Value::from(self.identifier.as_str()));
        object.insert(NAME_KEY.to_owned(), Value::from(self.name.as_str()));
        let optional_fields = [
            (ACCOUNT_NUMBER_KEY, &self.account_number),
            (BRANCH_GROUP_NAME_KEY, &self.branch_group_name),
            (BRANCH_NAME_KEY, &self.branch_name),
            (ROLE_KEY, &self.role),
        ];
        for (key, field) in optional_fields {
            if let Some(value) = field {
                object.insert(key.to_owned(), Value::from(value.as_str()));
            }
        }
        Value::Object(object)
    }

    /// Whether two records describe the same officer, ignoring `retrieved_at`.
    #[must_use]
    pub fn same_officer(&self, other: &Self) -> bool {
        self.name == other.name
            && self.identifier == other.identifier
            && self.account_number == other.account_number
            && self.branch_group_name == other.branch_group_name
            && self.branch_name == other.branch_name
            && self.role == other.role
    }
}

/// Parse trimmed plaintext into a JSON value.
///
/// # Errors
///
/// Returns [`PayloadError::NotJson`] when parsing fails.
pub fn parse_plaintext(plaintext: &str) -> Result<Value, PayloadError> {
    serde_json::from_str(plaintext.trim()).map_err(|err| PayloadError::NotJson {
        message: err.to_string(),
    })
}

fn required(object: &Map<String, Value>, field: &'static str) -> Result<String, PayloadError> {
    optional(object, field).ok_or(PayloadError::MissingField { field })
}

fn optional(object: &Map<String, Value>, field: &str) -> Option<String> {
    let text = match object.get(field)? {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
