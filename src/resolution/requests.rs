//! # Operation Inputs
//!
//! Request shapes for the four user operations and their validation.
//! Every field is optional at the parsing stage so a missing field becomes
//! an `InvalidInput` naming it, not a generic body rejection.

use serde::Deserialize;

use crate::records::{Record, RecordPatch};

use super::errors::{RecordError, RecordResult};

/// List filter (`GET /users?name=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, alias = "nama")]
    pub name: Option<String>,
}

impl ListQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// The filter to apply, if any. Blank filters count as absent.
    pub fn filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Create input (`POST /users`)
#[derive(Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, alias = "nama")]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CreateUserRequest {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Check every field and build the record to insert
    pub fn validate(self) -> RecordResult<Record> {
        let mut missing = Vec::new();
        let name = required(self.name, "name", &mut missing);
        let username = required(self.username, "username", &mut missing);
        let password = required(self.password, "password", &mut missing);
        reject_missing(&missing)?;

        Ok(Record::new(name, username, password))
    }
}

/// Update input (`PUT /users`)
#[derive(Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "nama")]
    pub name: Option<String>,
    #[serde(default, rename = "newUsername")]
    pub new_username: Option<String>,
    #[serde(default, rename = "newPassword")]
    pub new_password: Option<String>,
}

impl UpdateUserRequest {
    pub fn new(
        name: impl Into<String>,
        new_username: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            new_username: Some(new_username.into()),
            new_password: Some(new_password.into()),
        }
    }

    /// Check every field and split into lookup name and patch
    pub fn validate(self) -> RecordResult<(String, RecordPatch)> {
        let mut missing = Vec::new();
        let name = required(self.name, "name", &mut missing);
        let username = required(self.new_username, "newUsername", &mut missing);
        let password = required(self.new_password, "newPassword", &mut missing);
        reject_missing(&missing)?;

        Ok((name, RecordPatch::new(username, password)))
    }
}

/// Delete input (`DELETE /users`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default, alias = "nama")]
    pub name: Option<String>,
}

impl DeleteUserRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn validate(self) -> RecordResult<String> {
        let mut missing = Vec::new();
        let name = required(self.name, "name", &mut missing);
        reject_missing(&missing)?;
        Ok(name)
    }
}

// Blank strings count as missing; non-blank values are kept verbatim.
fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

fn reject_missing(missing: &[&str]) -> RecordResult<()> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(RecordError::InvalidInput(format!(
        "missing required field(s): {}",
        missing.join(", ")
    )))
}
