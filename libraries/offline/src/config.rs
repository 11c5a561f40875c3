use chrono::TimeDelta;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfflineConfig {
    /// Prefix for relative API links. `None` leaves them as they are.
    pub api_base: Option<String>,
    pub conferences_url: String,
    /// Single abstracts live at `{abstracts_url}/{id}`, their state below that.
    pub abstracts_url: String,
    pub last_updated_key: String,
    pub refresh_interval_hours: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("refreshIntervalHours must be between 0 and {max}, got {hours}", max = TimeDelta::MAX.num_hours())]
pub struct IntervalOutOfRange {
    pub hours: i64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            conferences_url: "/api/conferences".to_string(),
            abstracts_url: "/api/abstracts".to_string(),
            last_updated_key: "lastUpdated".to_string(),
            refresh_interval_hours: 24,
        }
    }
}

impl OfflineConfig {
    pub fn validate(&self) -> Result<(), IntervalOutOfRange> {
        let hours = self.refresh_interval_hours;
        match TimeDelta::try_hours(hours) {
            Some(_) if hours >= 0 => Ok(()),
            _ => Err(IntervalOutOfRange { hours }),
        }
    }

    /// Negative values count as zero and values too large to represent as forever.
    pub fn refresh_interval(&self) -> TimeDelta {
        TimeDelta::try_hours(self.refresh_interval_hours.max(0)).unwrap_or(TimeDelta::MAX)
    }

    pub fn conference_url(&self, id: &str) -> String {
        format!("{}/{id}", self.conferences_url.trim_end_matches('/'))
    }

    pub fn abstract_url(&self, id: &str) -> String {
        format!("{}/{id}", self.abstracts_url.trim_end_matches('/'))
    }

    pub fn state_url(&self, id: &str) -> String {
        format!("{}/state", self.abstract_url(id))
    }

    pub fn state_log_url(&self, id: &str) -> String {
        format!("{}/stateLog", self.abstract_url(id))
    }
}
