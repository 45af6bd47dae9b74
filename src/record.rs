//! Assignment user records and the editable form over them.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::normalize::truthy;

/// Gender values the edit form accepts. Empty means unset.
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// One assignment user, every field in its textual form-value shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub assignment_text: String,
    pub company_name: String,
}

impl UserRecord {
    /// Read a record from a backend object, tolerating alternate key names.
    /// `fallback_name` is used when the object names no user.
    #[must_use]
    pub fn from_value(value: &Value, fallback_name: &str) -> Self {
        Self {
            name: first_text(value, &["name1", "name"]).unwrap_or_else(|| fallback_name.to_owned()),
            age: present_text(value, "age"),
            gender: present_text(value, "gender"),
            assignment_text: first_text(value, &["react_js_assignment", "react_assignment"]).unwrap_or_default(),
            company_name: present_text(value, "company_name"),
        }
    }

    /// The editable fields in wire form, as sent to the update endpoint.
    #[must_use]
    pub fn to_update_body(&self) -> Value {
        let mut body = Map::new();
        for field in UserField::ALL {
            body.insert(field.wire_key().to_owned(), Value::String(self.get(field).to_owned()));
        }
        Value::Object(body)
    }

    /// `base` with this record's editable fields laid over it.
    #[must_use]
    pub fn merged_over(&self, base: &Value) -> Value {
        let mut merged = base.as_object().cloned().unwrap_or_default();
        if let Value::Object(fields) = self.to_update_body() {
            merged.extend(fields);
        }
        Value::Object(merged)
    }

    #[must_use]
    pub fn get(&self, field: UserField) -> &str {
        match field {
            UserField::Name => &self.name,
            UserField::Age => &self.age,
            UserField::Gender => &self.gender,
            UserField::AssignmentText => &self.assignment_text,
            UserField::CompanyName => &self.company_name,
        }
    }

    fn slot(&mut self, field: UserField) -> &mut String {
        match field {
            UserField::Name => &mut self.name,
            UserField::Age => &mut self.age,
            UserField::Gender => &mut self.gender,
            UserField::AssignmentText => &mut self.assignment_text,
            UserField::CompanyName => &mut self.company_name,
        }
    }
}

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Age,
    Gender,
    AssignmentText,
    CompanyName,
}

impl UserField {
    pub const ALL: [Self; 5] = [Self::Name, Self::Age, Self::Gender, Self::AssignmentText, Self::CompanyName];

    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Name => "name1",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::AssignmentText => "react_js_assignment",
            Self::CompanyName => "company_name",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "User Name",
            Self::Age => "User Age",
            Self::Gender => "User Gender",
            Self::AssignmentText => "React JS Assignment",
            Self::CompanyName => "User Company Name",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

impl FromStr for UserField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" | "name1" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            "assignment" | "react_js_assignment" => Ok(Self::AssignmentText),
            "company" | "company_name" => Ok(Self::CompanyName),
            other => Err(FormError::UnknownField(other.to_owned())),
        }
    }
}

// =============================================================================
// FORM
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("User Name is required.")]
    NameRequired,
    #[error("User Age must be a whole number of 0 or more.")]
    InvalidAge,
    #[error("User Gender must be one of Male, Female, Other.")]
    InvalidGender,
    #[error("User is not loaded.")]
    NotLoaded,
}

/// Edited values plus the last-saved baseline they are dirty-checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    values: UserRecord,
    baseline: UserRecord,
}

impl UserForm {
    #[must_use]
    pub fn new(record: UserRecord) -> Self {
        Self { values: record.clone(), baseline: record }
    }

    #[must_use]
    pub fn values(&self) -> &UserRecord {
        &self.values
    }

    #[must_use]
    pub fn baseline(&self) -> &UserRecord {
        &self.baseline
    }

    /// Set one field, applying the same constraints as the edit form inputs.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not acceptable for the field.
    pub fn set(&mut self, field: UserField, value: &str) -> Result<(), FormError> {
        match field {
            UserField::Name if value.trim().is_empty() => return Err(FormError::NameRequired),
            UserField::Age if !value.is_empty() && value.trim().parse::<u32>().is_err() => {
                return Err(FormError::InvalidAge);
            }
            UserField::Gender if !value.is_empty() && !GENDERS.contains(&value) => {
                return Err(FormError::InvalidGender);
            }
            _ => {}
        }
        *self.values.slot(field) = if field == UserField::Age { value.trim().to_owned() } else { value.to_owned() };
        Ok(())
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.values != self.baseline
    }

    /// Adopt `record` as both the new values and the new baseline.
    pub fn reset(&mut self, record: UserRecord) {
        self.values = record.clone();
        self.baseline = record;
    }
}

// =============================================================================
// LIST CARDS
// =============================================================================

/// Summary shown per user in the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub company_name: Option<String>,
}

impl UserCard {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: first_text(value, &["name1", "user_name", "name"]).unwrap_or_default(),
            gender: first_text(value, &["gender"]),
            age: first_text(value, &["age"]),
            company_name: first_text(value, &["company_name"]),
        }
    }

    /// Route to this user's detail view.
    #[must_use]
    pub fn href(&self) -> String {
        crate::routes::Route::UserDetail(self.name.clone()).path()
    }
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find(|v| truthy(v))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Text of `key` where only absent, `null` and `false` read as empty. Falsy
/// values such as `0` or `""` are kept as they are.
fn present_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null | Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
