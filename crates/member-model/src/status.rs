//! Canonical membership verification status.
//!
//! Portal pages stored "verified" as a boolean, a numeric code, or one of
//! several strings. All of them collapse into [`MembershipStatus`] here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Verification state of a membership application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Submitted, not yet reviewed. Also the state for unknown inputs.
    #[default]
    Pending,

    /// Approved by an administrator.
    Verified,

    /// Application turned down.
    Rejected,

    /// Previously verified, currently not in good standing.
    Suspended,
}

impl MembershipStatus {
    /// Interpret any JSON shape a page may have sent.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => MembershipStatus::Verified,
            Value::Bool(false) => MembershipStatus::Pending,
            Value::Number(n) => match n.as_i64() {
                Some(1) => MembershipStatus::Verified,
                Some(-1) => MembershipStatus::Rejected,
                Some(2) => MembershipStatus::Suspended,
                _ => MembershipStatus::Pending,
            },
            Value::String(s) => Self::parse_loose(s),
            _ => MembershipStatus::Pending,
        }
    }

    /// Case-insensitive string form.
    pub fn parse_loose(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "verified" | "approved" | "active" | "yes" | "true" | "1" => {
                MembershipStatus::Verified
            }
            "rejected" | "denied" | "declined" | "-1" => MembershipStatus::Rejected,
            "suspended" | "inactive" | "revoked" | "2" => MembershipStatus::Suspended,
            _ => MembershipStatus::Pending,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, MembershipStatus::Verified)
    }

    /// Label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "Pending",
            MembershipStatus::Verified => "Verified",
            MembershipStatus::Rejected => "Rejected",
            MembershipStatus::Suspended => "Suspended",
        }
    }
}

impl<'de> Deserialize<'de> for MembershipStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
