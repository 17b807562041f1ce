//! Shapes shared by every resource: the base record envelope, pagination
//! envelopes, and the closed category/status enums.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_FEATURED_LIMIT: i64 = 10;

/// Opaque record identifier. Must be a hyphenated UUID; the original string
/// is kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn parse(raw: &str) -> Option<Self> {
        let hyphenated = raw.len() == 36 && raw.matches('-').count() == 4;
        if hyphenated && uuid::Uuid::try_parse(raw).is_ok() {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ResourceId::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a UUID", raw)))
    }
}

/// UTC timestamp in RFC 3339 `Z` form (`2025-01-15T10:30:00Z`, optional
/// fractional seconds), kept as received. Numeric offsets are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    parsed: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.ends_with('Z') || raw.as_bytes().get(10) != Some(&b'T') {
            return None;
        }
        DateTime::parse_from_rfc3339(raw).ok().map(|parsed| Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        self.parsed
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a UTC RFC 3339 timestamp", raw)))
    }
}

/// Nullable but required: the key must be present, though its value may be
/// `null`. Plain `Option` fields would also accept a missing key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Fields every full record carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub id: ResourceId,
    pub created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    pub updated_at: Option<Timestamp>,
}

/// `{ items, total, skip, limit }`. `total` counts every matching record,
/// so `items.len()` may be smaller than both `total` and `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

impl<T> ListEnvelope<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another page exists past this one.
    pub fn has_more(&self) -> bool {
        let seen = i64::try_from(self.items.len()).unwrap_or(i64::MAX);
        self.skip.saturating_add(seen) < self.total
    }
}

/// `{ items, total }` used for navigation menus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEnvelope<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Unknown,
    Active,
    Maintained,
    Archived,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Unknown,
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationCategory {
    Unknown,
    Security,
    Cloud,
    Programming,
    Networking,
    Database,
    Devops,
}

impl CertificationCategory {
    /// Path segment and query-key token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Security => "security",
            Self::Cloud => "cloud",
            Self::Programming => "programming",
            Self::Networking => "networking",
            Self::Database => "database",
            Self::Devops => "devops",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogCategory {
    Unknown,
    Tutorial,
    DeepDive,
    Career,
    Project,
    Opinion,
}

impl BlogCategory {
    /// Path segment and query-key token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Tutorial => "tutorial",
            Self::DeepDive => "deep_dive",
            Self::Career => "career",
            Self::Project => "project",
            Self::Opinion => "opinion",
        }
    }
}
