//! Member record as submitted by the portal's registration and profile pages.
//!
//! The pages were inconsistent about key names and value types (phone numbers
//! as numbers, ages as strings, several spellings of the member ID), so the
//! record is read from a loose JSON object rather than a strict schema. Every
//! scalar becomes `Option<String>`; values that are not strings, numbers, or
//! booleans are treated as absent, and so are `false` and `0`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use unionportal_common::PortalError;

use crate::status::MembershipStatus;
use crate::text::normalize;

/// A member's profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    #[serde(rename = "memberID")]
    pub member_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    /// Single display name, used only when the name parts are all empty.
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub place_of_birth: Option<String>,
    /// Explicit age, used when the birth date cannot be parsed.
    pub age: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    pub employer: Option<String>,
    pub employer_address: Option<String>,
    pub position: Option<String>,
    pub date_hired: Option<String>,
    pub union_role: Option<String>,
    pub local_chapter: Option<String>,
    pub application_date: Option<String>,
    pub status: MembershipStatus,
    pub emergency_contact: EmergencyContact,
}

/// Person to notify in an emergency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Accepted keys per field, first match wins.
mod keys {
    pub const MEMBER_ID: &[&str] = &["memberID", "memberId", "member_id", "membershipId"];
    pub const FIRST_NAME: &[&str] = &["firstName", "first_name", "firstname"];
    pub const MIDDLE_NAME: &[&str] = &["middleName", "middle_name", "middleInitial"];
    pub const LAST_NAME: &[&str] = &["lastName", "last_name", "lastname", "surname"];
    pub const SUFFIX: &[&str] = &["suffix", "nameSuffix"];
    pub const NAME: &[&str] = &["name", "fullName", "full_name"];
    pub const BIRTH_DATE: &[&str] = &["birthDate", "birth_date", "dateOfBirth", "birthday", "dob"];
    pub const PLACE_OF_BIRTH: &[&str] = &["placeOfBirth", "place_of_birth", "birthPlace"];
    pub const AGE: &[&str] = &["age"];
    pub const ADDRESS: &[&str] = &["address", "homeAddress", "home_address"];
    pub const PHONE: &[&str] = &["phone", "contactNumber", "mobile", "phoneNumber"];
    pub const EMAIL: &[&str] = &["email", "emailAddress"];
    pub const MARITAL_STATUS: &[&str] = &["maritalStatus", "marital_status", "civilStatus"];
    pub const GENDER: &[&str] = &["gender", "sex"];
    pub const EMPLOYER: &[&str] = &["employer", "company", "companyName"];
    pub const EMPLOYER_ADDRESS: &[&str] = &["employerAddress", "employer_address", "companyAddress"];
    pub const POSITION: &[&str] = &["position", "jobTitle", "occupation"];
    pub const DATE_HIRED: &[&str] = &["dateHired", "date_hired", "hireDate"];
    pub const UNION_ROLE: &[&str] = &["unionRole", "union_role", "unionPosition", "role"];
    pub const LOCAL_CHAPTER: &[&str] = &["localChapter", "local_chapter", "chapter", "local"];
    pub const APPLICATION_DATE: &[&str] = &["applicationDate", "application_date", "dateApplied"];
    pub const STATUS: &[&str] = &["status", "verificationStatus", "isVerified", "verified"];
    pub const EMERGENCY_CONTACT: &[&str] = &["emergencyContact", "emergency_contact", "emergency"];

    pub const CONTACT_NAME: &[&str] = &["name", "fullName", "contactName"];
    pub const CONTACT_RELATIONSHIP: &[&str] = &["relationship", "relation"];
    pub const CONTACT_PHONE: &[&str] = &["phone", "contactNumber", "mobile"];
    pub const CONTACT_ADDRESS: &[&str] = &["address"];
}

impl MemberRecord {
    /// Build a record from any JSON value. Non-objects yield an empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let status = keys::STATUS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|v| !v.is_null())
            .map(MembershipStatus::from_value)
            .unwrap_or_default();

        let emergency_contact = keys::EMERGENCY_CONTACT
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(Value::as_object)
            .map(EmergencyContact::from_map)
            .unwrap_or_default();

        Self {
            member_id: text(obj, keys::MEMBER_ID),
            first_name: text(obj, keys::FIRST_NAME),
            middle_name: text(obj, keys::MIDDLE_NAME),
            last_name: text(obj, keys::LAST_NAME),
            suffix: text(obj, keys::SUFFIX),
            name: text(obj, keys::NAME),
            birth_date: text(obj, keys::BIRTH_DATE),
            place_of_birth: text(obj, keys::PLACE_OF_BIRTH),
            age: text(obj, keys::AGE),
            address: text(obj, keys::ADDRESS),
            phone: text(obj, keys::PHONE),
            email: text(obj, keys::EMAIL),
            marital_status: text(obj, keys::MARITAL_STATUS),
            gender: text(obj, keys::GENDER),
            employer: text(obj, keys::EMPLOYER),
            employer_address: text(obj, keys::EMPLOYER_ADDRESS),
            position: text(obj, keys::POSITION),
            date_hired: text(obj, keys::DATE_HIRED),
            union_role: text(obj, keys::UNION_ROLE),
            local_chapter: text(obj, keys::LOCAL_CHAPTER),
            application_date: text(obj, keys::APPLICATION_DATE),
            status,
            emergency_contact,
        }
    }

    /// Parse a JSON document that must be an object.
    pub fn from_json_str(json: &str) -> Result<Self, MemberError> {
        let value: Value = serde_json::from_str(json).map_err(MemberError::Parse)?;
        if !value.is_object() {
            return Err(MemberError::NotAnObject);
        }
        Ok(Self::from_value(&value))
    }

    /// Read a member record from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MemberError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| MemberError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Normalized name parts joined by single spaces, or the display name.
    pub fn full_name(&self) -> String {
        let parts = [
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.suffix,
        ];
        let joined = parts
            .iter()
            .map(|part| normalize(part.as_deref()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            normalize(self.name.as_deref())
        } else {
            joined
        }
    }

    /// Normalized member ID, empty when absent.
    pub fn member_id(&self) -> String {
        normalize(self.member_id.as_deref())
    }
}

impl EmergencyContact {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            name: text(obj, keys::CONTACT_NAME),
            relationship: text(obj, keys::CONTACT_RELATIONSHIP),
            phone: text(obj, keys::CONTACT_PHONE),
            address: text(obj, keys::CONTACT_ADDRESS),
        }
    }

    /// True when no field carries visible text.
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.relationship, &self.phone, &self.address]
            .iter()
            .all(|v| normalize(v.as_deref()).is_empty())
    }
}

impl<'de> Deserialize<'de> for MemberRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom(
                "member record must be a JSON object",
            ));
        }
        Ok(Self::from_value(&value))
    }
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(scalar_to_string)
}

/// Falsy scalars (`false`, `0`) are absent, like null.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Errors reading a member record.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid member JSON: {0}")]
    Parse(serde_json::Error),

    #[error("Member record must be a JSON object")]
    NotAnObject,
}

impl From<MemberError> for PortalError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                PortalError::FileNotFound { path }
            }
            other => PortalError::member(other.to_string()),
        }
    }
}
