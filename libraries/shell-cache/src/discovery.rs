//! # Discovery
//! Finds the views that depend on API data: six per conference, keyed by its short code, and one per abstract.
//! The conference list must be reachable. A conference whose abstracts cannot be fetched simply contributes no
//! abstract views, so one broken conference never stops the shell from installing.

use futures::future::join_all;

use crate::{FetchRequest, Network, ShellError};

/// Appended to `/conference/{short}`; the empty suffix is the conference page itself.
pub const CONFERENCE_VIEWS: [&str; 6] = [
    "",
    "/schedule",
    "/submission",
    "/floorplans",
    "/locations",
    "/abstracts",
];

#[derive(serde::Deserialize)]
struct ConferenceEntry {
    #[serde(default)]
    short: Option<String>,
    #[serde(default)]
    abstracts: Option<String>,
}

#[derive(serde::Deserialize)]
struct AbstractEntry {
    #[serde(default)]
    uuid: Option<String>,
}

pub fn conference_routes(short: &str) -> impl Iterator<Item = String> + '_ {
    CONFERENCE_VIEWS
        .iter()
        .map(move |view| format!("/conference/{short}{view}"))
}

pub fn abstract_route(uuid: &str) -> String {
    format!("/abstracts/{uuid}")
}

/// Conference views first, then the abstract views of every conference in conference order.
pub async fn discover_dynamic_routes<N: Network>(
    network: &N,
    conferences_url: &str,
) -> Result<Vec<String>, ShellError> {
    let conferences: Vec<Option<ConferenceEntry>> = fetch_json(network, conferences_url)
        .await
        .map_err(|message| ShellError::Discovery {
            url: conferences_url.to_string(),
            message,
        })?;
    let conferences: Vec<ConferenceEntry> = conferences.into_iter().flatten().collect();

    let mut routes: Vec<String> = Vec::new();
    for conference in &conferences {
        match &conference.short {
            Some(short) => routes.extend(conference_routes(short)),
            None => log::warn!("Conference without a short code, skipping its views"),
        }
    }

    let abstract_routes = join_all(
        conferences
            .iter()
            .map(|conference| load_abstract_routes(network, conference.abstracts.as_deref())),
    )
    .await;
    routes.extend(abstract_routes.into_iter().flatten());

    Ok(routes)
}

/// Never fails: a broken listing yields no routes.
async fn load_abstract_routes<N: Network>(network: &N, abstracts_url: Option<&str>) -> Vec<String> {
    let Some(abstracts_url) = abstracts_url else {
        return Vec::new();
    };

    match fetch_json::<_, Vec<Option<AbstractEntry>>>(network, abstracts_url).await {
        Ok(abstracts) => abstracts
            .into_iter()
            .flatten()
            .filter_map(|abs| abs.uuid)
            .map(|uuid| abstract_route(&uuid))
            .collect(),
        Err(message) => {
            log::warn!("Could not fetch {abstracts_url}: {message}");
            Vec::new()
        }
    }
}

async fn fetch_json<N: Network, T: serde::de::DeserializeOwned>(
    network: &N,
    url: &str,
) -> Result<T, String> {
    let response = network
        .fetch(&FetchRequest::get(url))
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("status {}", response.status));
    }
    response.json().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNetwork;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_two_conferences_three_abstracts() {
        let network = FakeNetwork::new();
        network
            .json(
                "/api/conferences",
                json!([
                    {"short": "BC14", "abstracts": "/api/conferences/c1/abstracts"},
                    {"short": "NF15", "abstracts": "/api/conferences/c2/abstracts"}
                ]),
            )
            .json(
                "/api/conferences/c1/abstracts",
                json!([{"uuid": "a1"}, {"uuid": "a2"}, {"uuid": "a3"}]),
            )
            .json("/api/conferences/c2/abstracts", json!([]));

        let routes = block_on(discover_dynamic_routes(&network, "/api/conferences")).unwrap();
        assert_eq!(routes.len(), 2 * 6 + 3);
        assert_eq!(&routes[..6], &[
            "/conference/BC14",
            "/conference/BC14/schedule",
            "/conference/BC14/submission",
            "/conference/BC14/floorplans",
            "/conference/BC14/locations",
            "/conference/BC14/abstracts",
        ]);
        assert_eq!(&routes[12..], &["/abstracts/a1", "/abstracts/a2", "/abstracts/a3"]);
    }

    #[test]
    fn test_broken_abstracts_listing_is_skipped() {
        let network = FakeNetwork::new();
        network
            .json(
                "/api/conferences",
                json!([
                    {"short": "BC14", "abstracts": "/api/conferences/c1/abstracts"},
                    null,
                    {"short": "NF15", "abstracts": "/api/conferences/c2/abstracts"}
                ]),
            )
            .status("/api/conferences/c1/abstracts", 500)
            .json("/api/conferences/c2/abstracts", json!([{"uuid": "b1"}, null]));

        let routes = block_on(discover_dynamic_routes(&network, "/api/conferences")).unwrap();
        assert_eq!(routes.len(), 2 * 6 + 1);
        assert_eq!(routes.last().map(String::as_str), Some("/abstracts/b1"));
    }

    #[test]
    fn test_unreachable_conference_list_fails() {
        let network = FakeNetwork::new();
        let result = block_on(discover_dynamic_routes(&network, "/api/conferences"));
        assert!(matches!(result, Err(ShellError::Discovery { .. })));
    }
}
