//! Calls the abstract views make. Conference and abstract reads go through the read-through cache; state logs
//! and state changes are only meaningful online and go straight to the network.

use astate::{AbstractState, Openness, Role, StateChange, StateLogEntry, decorate_state_log};
use chrono::{DateTime, TimeZone};
use serde_json::Value;

use crate::{JsonClient, KeyValueStore, OfflineCache, OfflineError};

impl<S: KeyValueStore, C: JsonClient> OfflineCache<S, C> {
    pub async fn conference(&self, id: &str) -> Result<Value, OfflineError> {
        self.request_json(id, &self.config.conference_url(id)).await
    }

    pub async fn abstract_json(&self, id: &str) -> Result<Value, OfflineError> {
        self.request_json(id, &self.config.abstract_url(id)).await
    }

    pub async fn state_log<Tz: TimeZone>(
        &self,
        abstract_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<Vec<StateLogEntry>, OfflineError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let payload = self
            .client
            .get_json(&self.config.state_log_url(abstract_id))
            .await?;
        decode_state_log(abstract_id, payload, now)
    }

    /// Checks `change` against the transition table and only then sends it. Answers with the updated log.
    pub async fn change_state<Tz: TimeZone>(
        &self,
        abstract_id: &str,
        role: Role,
        openness: Openness,
        from: AbstractState,
        change: &StateChange,
        now: &DateTime<Tz>,
    ) -> Result<Vec<StateLogEntry>, OfflineError>
    where
        Tz::Offset: std::fmt::Display,
    {
        change.validate(role, openness, from).inspect_err(|e| {
            log::warn!("Refusing to send state change for {abstract_id}: {e}");
        })?;

        let body = serde_json::to_value(change).map_err(|source| OfflineError::Decode {
            key: abstract_id.to_string(),
            source,
        })?;

        let payload = self
            .client
            .put_json(&self.config.state_url(abstract_id), &body)
            .await
            .inspect_err(|e| {
                log::error!("Error while updating the state of {abstract_id}: {e}");
            })?;

        log::info!("Abstract {abstract_id} moved from {from} to {}", change.state);
        decode_state_log(abstract_id, payload, now)
    }
}

fn decode_state_log<Tz: TimeZone>(
    abstract_id: &str,
    payload: Value,
    now: &DateTime<Tz>,
) -> Result<Vec<StateLogEntry>, OfflineError>
where
    Tz::Offset: std::fmt::Display,
{
    let mut log: Vec<StateLogEntry> =
        serde_json::from_value(payload).map_err(|source| OfflineError::Decode {
            key: abstract_id.to_string(),
            source,
        })?;
    decorate_state_log(&mut log, now);
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, OfflineConfig, testing::FakeClient};
    use astate::StateError;
    use chrono::Utc;
    use futures::executor::block_on;
    use serde_json::json;

    fn cache(client: &FakeClient) -> OfflineCache<MemoryStore, &FakeClient> {
        OfflineCache::new(MemoryStore::new(), client, OfflineConfig::default())
    }

    #[test]
    fn test_invalid_transition_never_hits_the_network() {
        let client = FakeClient::new();
        let cache = cache(&client);
        let change = StateChange::new(AbstractState::Withdrawn, None).unwrap();

        let result = block_on(cache.change_state(
            "a1",
            Role::Owner,
            Openness::Closed,
            AbstractState::Submitted,
            &change,
            &Utc::now(),
        ));
        assert!(matches!(
            result,
            Err(OfflineError::State(StateError::InvalidTransition { .. }))
        ));
        assert!(client.calls().is_empty());
        assert!(client.puts().is_empty());
    }

    #[test]
    fn test_change_state_sends_body_and_decorates_log() {
        let client = FakeClient::new();
        let now = Utc::now();
        client.respond(
            "/api/abstracts/a1/state",
            json!([
                {"state": "Submitted", "timestamp": now.timestamp_millis()},
                {"state": "InReview", "timestamp": now.timestamp_millis(), "note": "assigned"}
            ]),
        );
        let cache = cache(&client);
        let change = StateChange::new(AbstractState::InReview, Some("assigned".into())).unwrap();

        let log = block_on(cache.change_state(
            "a1",
            Role::Admin,
            Openness::Closed,
            AbstractState::Submitted,
            &change,
            &now,
        ))
        .unwrap();

        assert_eq!(
            client.puts(),
            vec![(
                "/api/abstracts/a1/state".to_string(),
                json!({"state": "InReview", "note": "assigned"})
            )]
        );
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|entry| entry.formatted_date.is_some()));
        assert_eq!(log[1].state, AbstractState::InReview);
    }

    #[test]
    fn test_state_log_is_network_only() {
        let client = FakeClient::new();
        let cache = cache(&client);
        let result = block_on(cache.state_log("a1", &Utc::now()));
        assert!(matches!(result, Err(OfflineError::Http(_))));
        assert!(cache.store().is_empty());
    }

    #[test]
    fn test_conference_and_abstract_are_cached_under_their_ids() {
        let client = FakeClient::new();
        client
            .respond("/api/conferences/c1", json!({"uuid": "c1"}))
            .respond("/api/abstracts/a1", json!({"uuid": "a1"}));
        let cache = cache(&client);

        block_on(cache.conference("c1")).unwrap();
        block_on(cache.abstract_json("a1")).unwrap();
        assert!(cache.store().contains_key("c1"));
        assert!(cache.store().contains_key("a1"));
    }
}
