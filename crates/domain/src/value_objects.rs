//! Status and type enums shared by the licensing aggregates.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default horizon of a time-bounded license, counted from its creation.
pub const DEFAULT_LICENSE_EXPIRATION_DAYS: i64 = 30;

/// How a license caps usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseType {
    /// Capped by the cumulative request count since activation.
    #[default]
    ByCount,

    /// Capped by a fixed expiration timestamp.
    ByTime,
}

impl LicenseType {
    /// Returns the wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::ByCount => "BY_COUNT",
            LicenseType::ByTime => "BY_TIME",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation status of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    Active,
    #[default]
    Inactive,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Active => "ACTIVE",
            LicenseStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a subdivision currently accepts usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Active,
    #[default]
    Inactive,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Active => "ACTIVE",
            WorkStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules applied when new licenses are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicensePolicy {
    expiration: Duration,
}

impl LicensePolicy {
    /// Creates a policy whose licenses expire `days` after creation.
    pub fn with_expiration_days(days: i64) -> Self {
        Self {
            expiration: Duration::days(days),
        }
    }

    /// Returns the expiration horizon.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self::with_expiration_days(DEFAULT_LICENSE_EXPIRATION_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_default_to_inactive() {
        assert_eq!(LicenseStatus::default(), LicenseStatus::Inactive);
        assert_eq!(WorkStatus::default(), WorkStatus::Inactive);
    }

    #[test]
    fn license_type_uses_screaming_snake_case() {
        let json = serde_json::to_string(&LicenseType::ByCount).unwrap();
        assert_eq!(json, "\"BY_COUNT\"");

        let parsed: LicenseType = serde_json::from_str("\"BY_TIME\"").unwrap();
        assert_eq!(parsed, LicenseType::ByTime);
        assert_eq!(parsed.to_string(), "BY_TIME");
    }

    #[test]
    fn default_policy_expires_after_thirty_days() {
        assert_eq!(LicensePolicy::default().expiration(), Duration::days(30));
        assert_eq!(
            LicensePolicy::with_expiration_days(7).expiration(),
            Duration::days(7)
        );
    }
}
