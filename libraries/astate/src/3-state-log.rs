//! # State log
//! The server keeps an append-only log of every transition an abstract went through. The client only reads it,
//! and decorates every entry with a calendar-style date for display ("Today at 2:30 PM", "Last Monday at 9:00 AM").

use chrono::{DateTime, TimeZone, Utc};

use crate::AbstractState;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct StateLogEntry {
    pub state: AbstractState,
    #[serde(with = "timestamp")]
    #[cfg_attr(target_arch = "wasm32", tsify(type = "string"))]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
}

impl StateLogEntry {
    /// Calendar representation of `timestamp` relative to `now`, in `now`'s time zone.
    pub fn formatted_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        calendar(&self.timestamp.with_timezone(&now.timezone()), now)
    }
}

/// Fills in `formatted_date` on every entry.
pub fn decorate_state_log<Tz: TimeZone>(entries: &mut [StateLogEntry], now: &DateTime<Tz>)
where
    Tz::Offset: std::fmt::Display,
{
    for entry in entries.iter_mut() {
        entry.formatted_date = Some(entry.formatted_date(now));
    }
}

fn calendar<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let days = (date.date_naive() - now.date_naive()).num_days();
    let time = date.format("%-I:%M %p");
    match days {
        -6..=-2 => format!("Last {} at {time}", date.format("%A")),
        -1 => format!("Yesterday at {time}"),
        0 => format!("Today at {time}"),
        1 => format!("Tomorrow at {time}"),
        2..=6 => format!("{} at {time}", date.format("%A")),
        _ => date.format("%m/%d/%Y").to_string(),
    }
}

/// The server sends epoch milliseconds, older deployments send ISO 8601 strings.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(DateTime<Utc>),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}"))),
            Raw::Text(date) => Ok(date),
        }
    }
}
