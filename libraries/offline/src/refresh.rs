//! # Refresh
//! The once-a-day bulk pass that pre-fills the store with every conference and its sub-resources.
//!
//! `lastUpdated` is written at the end of every pass that got hold of the conference list, even when some of the
//! per-conference fetches failed. A flapping network therefore cannot cause a refresh on every page load, at the
//! price of sub-resources possibly staying stale until the next window. When the conference list itself cannot
//! be fetched nothing was refreshed, and `lastUpdated` is left alone so that the next page load tries again.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde_json::Value;

use crate::{
    JsonClient, KeyValueStore, OfflineCache, OfflineError, StoreError,
    model::{ConferenceLinks, ConferenceResource, abstract_uuids},
};

/// Explicit replacement for the global `lastUpdated` timestamp, persisted as epoch milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheState {
    pub last_updated: Option<DateTime<Utc>>,
}

impl CacheState {
    pub async fn load<S: KeyValueStore>(store: &S, key: &str) -> Result<Self, StoreError> {
        let last_updated = store.get(key).await?.and_then(|raw| {
            let parsed = raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis);
            if parsed.is_none() {
                log::warn!("Ignoring unreadable {key} value {raw:?}");
            }
            parsed
        });

        Ok(Self { last_updated })
    }

    pub async fn persist<S: KeyValueStore>(&self, store: &S, key: &str) -> Result<(), StoreError> {
        match self.last_updated {
            Some(last_updated) => {
                store
                    .set(key, &last_updated.timestamp_millis().to_string())
                    .await
            }
            None => Ok(()),
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        match self.last_updated {
            Some(last_updated) => now - last_updated > interval,
            None => true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub conferences: usize,
    /// Number of keys written.
    pub stored: usize,
    /// Failed fetches and failed writes.
    pub failed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RefreshOutcome {
    /// `lastUpdated` is recent, nothing was fetched.
    Fresh,
    Refreshed(RefreshReport),
    /// The conference list could not be fetched.
    Unreachable,
}

#[derive(Default)]
struct Tally {
    stored: usize,
    failed: usize,
}

impl Tally {
    fn record(&mut self, key: &str, result: Result<(), StoreError>) {
        match result {
            Ok(()) => self.stored += 1,
            Err(e) => {
                log::warn!("Could not store {key}: {e}");
                self.failed += 1;
            }
        }
    }
}

impl<S: KeyValueStore, C: JsonClient> OfflineCache<S, C> {
    /// Meant to be called once per page load.
    pub async fn refresh_if_stale(&self) -> Result<RefreshOutcome, OfflineError> {
        self.refresh_if_stale_at(Utc::now()).await
    }

    pub async fn refresh_if_stale_at(&self, now: DateTime<Utc>) -> Result<RefreshOutcome, OfflineError> {
        let key = &self.config.last_updated_key;
        let state = CacheState::load(&self.store, key).await?;

        if !state.is_stale(now, self.config.refresh_interval()) {
            log::info!("Local store is fresh, skipping refresh");
            return Ok(RefreshOutcome::Fresh);
        }

        let (state, outcome) = self.refresh(state, now).await;
        state.persist(&self.store, key).await?;
        Ok(outcome)
    }

    /// Runs one bulk pass regardless of staleness. Per-resource failures are logged and counted, never returned.
    pub async fn refresh(
        &self,
        mut state: CacheState,
        now: DateTime<Utc>,
    ) -> (CacheState, RefreshOutcome) {
        let conferences = match self.conference_list().await {
            Ok(conferences) => conferences,
            Err(e) => {
                log::warn!("Refresh skipped, could not fetch the conference list: {e}");
                return (state, RefreshOutcome::Unreachable);
            }
        };

        let tallies = join_all(
            conferences
                .iter()
                .map(|conference| self.refresh_conference(conference)),
        )
        .await;

        let report = RefreshReport {
            conferences: conferences.len(),
            stored: tallies.iter().map(|t| t.stored).sum(),
            failed: tallies.iter().map(|t| t.failed).sum(),
        };
        log::info!(
            "Refreshed {} conferences: {} keys stored, {} failures",
            report.conferences,
            report.stored,
            report.failed
        );

        state.last_updated = Some(now);

        (state, RefreshOutcome::Refreshed(report))
    }

    async fn conference_list(&self) -> Result<Vec<Value>, String> {
        let url = &self.config.conferences_url;
        let payload = self.client.get_json(url).await.map_err(|e| e.to_string())?;
        let conferences: Vec<Value> = serde_json::from_value(payload)
            .map_err(|e| format!("{url} did not answer with a list: {e}"))?;
        Ok(conferences.into_iter().filter(|c| !c.is_null()).collect())
    }

    async fn refresh_conference(&self, conference: &Value) -> Tally {
        let mut tally = Tally::default();

        let links: ConferenceLinks = match serde_json::from_value(conference.clone()) {
            Ok(links) => links,
            Err(e) => {
                log::warn!("Skipping conference without usable links: {e}");
                tally.failed += 1;
                return tally;
            }
        };

        tally.record(&links.uuid, self.store_json(&links.uuid, conference).await);

        let fetched = join_all(
            ConferenceResource::ALL
                .into_iter()
                .filter_map(|resource| links.link(resource).map(|url| (resource, url)))
                .map(|(resource, url)| async move { (resource, self.client.get_json(url).await) }),
        )
        .await;

        for (resource, result) in fetched {
            let payload = match result {
                Ok(payload) => payload,
                Err(e) => {
                    log::warn!("Could not refresh {resource:?} of conference {}: {e}", links.uuid);
                    tally.failed += 1;
                    continue;
                }
            };

            let key = resource.key(&links.uuid);
            tally.record(&key, self.store_json(&key, &payload).await);

            if resource == ConferenceResource::Abstracts {
                for (uuid, abs) in abstract_uuids(&payload) {
                    tally.record(uuid, self.store_json(uuid, abs).await);
                }
            }
        }

        tally
    }
}
