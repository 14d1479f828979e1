//! crates/portfolio_core/src/domain.rs
//!
//! Defines the core data records: Q&A questions with their replies, and
//! meeting bookings. Field names follow the portfolio site's records, but
//! timestamps are RFC 3339 and durations are numbers, so browser-storage
//! exports need converting before they load.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Community Q&A
//=========================================================================================

/// A question posted to the community board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Oldest first.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// An answer to a question. Only ever lives inside its parent `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub text: String,
    pub author: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Meetings
//=========================================================================================

/// A meeting booking made through the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub format: MeetingFormat,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    /// Minutes.
    pub duration: u32,
    pub topic: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: MeetingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Consultation,
    Mentoring,
    Project,
    Career,
    Networking,
    Other,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Consultation => "consultation",
            MeetingType::Mentoring => "mentoring",
            MeetingType::Project => "project",
            MeetingType::Career => "career",
            MeetingType::Networking => "networking",
            MeetingType::Other => "other",
        }
    }
}

impl FromStr for MeetingType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consultation" => Ok(MeetingType::Consultation),
            "mentoring" => Ok(MeetingType::Mentoring),
            "project" => Ok(MeetingType::Project),
            "career" => Ok(MeetingType::Career),
            "networking" => Ok(MeetingType::Networking),
            "other" => Ok(MeetingType::Other),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingFormat {
    Video,
    Phone,
    InPerson,
}

impl MeetingFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingFormat::Video => "video",
            MeetingFormat::Phone => "phone",
            MeetingFormat::InPerson => "in-person",
        }
    }
}

impl FromStr for MeetingFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MeetingFormat::Video),
            "phone" => Ok(MeetingFormat::Phone),
            "in-person" => Ok(MeetingFormat::InPerson),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for MeetingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking status. New bookings are `Pending` and the site shows them as "scheduled".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Pending,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Pending => "pending",
        }
    }
}

/// Returned when a string names no known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

/// `HH:MM` wall-clock times, as produced by an HTML time input.
pub mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parses `HH:MM` (seconds are accepted and dropped).
    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        let raw = raw.trim();
        let time = NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))?;
        Ok(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }
}
