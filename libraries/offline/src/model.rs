//! The few fields of API payloads this crate needs to look at. Payloads are otherwise stored untouched.

use serde_json::Value;

/// Links of a conference object (`GET /api/conferences`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceLinks {
    pub uuid: String,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub abstracts: Option<String>,
    #[serde(default)]
    pub geo: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl ConferenceLinks {
    pub fn link(&self, resource: ConferenceResource) -> Option<&str> {
        match resource {
            ConferenceResource::Abstracts => self.abstracts.as_deref(),
            ConferenceResource::Geo => self.geo.as_deref(),
            ConferenceResource::Schedule => self.schedule.as_deref(),
            ConferenceResource::Info => self.info.as_deref(),
        }
    }
}

/// Sub-resources of a conference that are stored under a key derived from the conference uuid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConferenceResource {
    Abstracts,
    Geo,
    Schedule,
    Info,
}

impl ConferenceResource {
    pub const ALL: [ConferenceResource; 4] = [
        ConferenceResource::Abstracts,
        ConferenceResource::Geo,
        ConferenceResource::Schedule,
        ConferenceResource::Info,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ConferenceResource::Abstracts => "abstracts",
            ConferenceResource::Geo => "geo",
            ConferenceResource::Schedule => "schedule",
            ConferenceResource::Info => "info",
        }
    }

    /// e.g. `{uuid}abstracts`, `{uuid}geo`
    pub fn key(&self, conference_uuid: &str) -> String {
        format!("{conference_uuid}{}", self.suffix())
    }
}

/// Uuids of the objects in an abstracts listing. Entries without one are skipped.
pub fn abstract_uuids(abstracts: &Value) -> Vec<(&str, &Value)> {
    abstracts
        .as_array()
        .map(|abstracts| {
            abstracts
                .iter()
                .filter_map(|abs| abs.get("uuid").and_then(Value::as_str).map(|uuid| (uuid, abs)))
                .collect()
        })
        .unwrap_or_default()
}
