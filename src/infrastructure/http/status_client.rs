//! Charger status REST client
//!
//! Polls `GET <base_url>?filter_eq[name]=<charger>` and flattens the
//! `entities[].ports[]` tree of the response into [`PortReading`]s.
//!
//! Nothing here fails outward: transport errors, non-2xx answers, bodies that
//! are not JSON and bodies of the wrong shape all collapse into the single
//! sentinel reading `("unknown", "error")`. The reason is only logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::domain::charger::{ChargerId, PortReading, UNKNOWN};
use crate::domain::ports::StatusSource;
use crate::shared::errors::{FetchError, MonitorError};

/// Query parameter the endpoint filters chargers by
const NAME_FILTER: &str = "filter_eq[name]";

/// Longest slice of a non-2xx body kept for the log line
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Clone)]
pub struct StatusApiClient {
    base_url: Url,
    client: Client,
}

impl StatusApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MonitorError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MonitorError::HttpClient(format!("invalid base URL '{}': {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn charger_url(&self, charger: &ChargerId) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair(NAME_FILTER, charger.as_str());
        url
    }

    /// One request, no retries. Returns whatever readings the body yields,
    /// which may be none.
    pub async fn query(&self, charger: &ChargerId) -> Result<Vec<PortReading>, FetchError> {
        let url = self.charger_url(charger);
        debug!("🔍 Querying {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_LEN).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        trace!("[{}] response body: {}", charger, body);
        extract_port_readings(&body)
    }
}

#[async_trait]
impl StatusSource for StatusApiClient {
    async fn fetch(&self, charger: &ChargerId) -> Vec<PortReading> {
        let result = self.query(charger).await;
        if let Err(e) = &result {
            warn!(charger = %charger, kind = e.kind(), "Error querying API for {}: {}", charger, e);
            metrics::counter!(
                "charger_fetch_fallbacks_total",
                "charger" => charger.to_string(),
                "reason" => e.kind()
            )
            .increment(1);
        }
        readings_or_sentinel(result)
    }
}

/// Collapse a fetch outcome into the non-empty list the recorder consumes.
pub fn readings_or_sentinel(result: Result<Vec<PortReading>, FetchError>) -> Vec<PortReading> {
    match result {
        Ok(readings) if !readings.is_empty() => readings,
        _ => vec![PortReading::sentinel()],
    }
}

/// Walk `entities[].ports[]` and collect one reading per port.
///
/// Entities without a `ports` array contribute nothing. A missing `portId` or
/// `status` becomes `"unknown"`. An entity or port that is not a JSON object
/// fails the whole extraction.
pub fn extract_port_readings(body: &Value) -> Result<Vec<PortReading>, FetchError> {
    let entities = match body.get("entities") {
        Some(Value::Array(entities)) => entities,
        Some(_) => return Err(FetchError::Shape("'entities' is not an array".to_string())),
        None => return Err(FetchError::Shape("missing 'entities'".to_string())),
    };

    let mut readings = Vec::new();
    for (i, entity) in entities.iter().enumerate() {
        let entity = entity
            .as_object()
            .ok_or_else(|| FetchError::Shape(format!("entity #{} is not an object", i)))?;

        let Some(Value::Array(ports)) = entity.get("ports") else {
            continue;
        };

        for (j, port) in ports.iter().enumerate() {
            let port = port.as_object().ok_or_else(|| {
                FetchError::Shape(format!("port #{} of entity #{} is not an object", j, i))
            })?;
            readings.push(PortReading::new(
                field_text(port, "portId"),
                field_text(port, "status"),
            ));
        }
    }

    Ok(readings)
}

fn field_text(port: &Map<String, Value>, key: &str) -> String {
    match port.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const PATH: &str = "/core/v1/chargers";

    fn client(server: &Server) -> StatusApiClient {
        StatusApiClient::new(&format!("{}{}", server.url(), PATH), Duration::from_secs(5)).unwrap()
    }

    fn sentinel() -> Vec<PortReading> {
        vec![PortReading::new("unknown", "error")]
    }

    #[test]
    fn test_extract_nested_ports() {
        let body = json!({
            "entities": [
                { "name": "NSP-BRI-01", "ports": [
                    { "portId": "A1", "status": "AVAILABLE" },
                    { "portId": "A2", "status": "CHARGING" }
                ]},
                { "name": "no-ports" },
                { "ports": [ { "portId": "B1" }, { "status": "OFFLINE" } ] }
            ]
        });

        let readings = extract_port_readings(&body).unwrap();
        assert_eq!(
            readings,
            vec![
                PortReading::new("A1", "AVAILABLE"),
                PortReading::new("A2", "CHARGING"),
                PortReading::new("B1", "unknown"),
                PortReading::new("unknown", "OFFLINE"),
            ]
        );
    }

    #[test]
    fn test_extract_renders_scalar_fields() {
        let body = json!({ "entities": [ { "ports": [
            { "portId": 1, "status": null },
            { "portId": true, "status": ["x"] }
        ]}]});

        let readings = extract_port_readings(&body).unwrap();
        assert_eq!(
            readings,
            vec![
                PortReading::new("1", "unknown"),
                PortReading::new("true", "unknown"),
            ]
        );
    }

    #[test]
    fn test_fallback_for_unexpected_shapes() {
        let shapes = [
            json!({}),
            json!({ "entities": {} }),
            json!({ "entities": "NSP-BRI-01" }),
            json!({ "entities": [] }),
            json!({ "entities": [ { "ports": [] } ] }),
            json!({ "entities": [ { "ports": "A1" } ] }),
            json!({ "entities": [ 42 ] }),
            json!({ "entities": [ { "ports": [ "A1" ] } ] }),
            json!([ { "ports": [ { "portId": "A1", "status": "ok" } ] } ]),
            json!("error"),
        ];

        for body in shapes {
            assert_eq!(
                readings_or_sentinel(extract_port_readings(&body)),
                sentinel(),
                "body: {}",
                body
            );
        }
    }

    #[test]
    fn test_malformed_entity_discards_earlier_readings() {
        let body = json!({ "entities": [
            { "ports": [ { "portId": "A1", "status": "AVAILABLE" } ] },
            "garbage"
        ]});
        assert_eq!(readings_or_sentinel(extract_port_readings(&body)), sentinel());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::UrlEncoded(
                "filter_eq[name]".into(),
                "NSP-BRI-01".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "entities": [ { "ports": [ { "portId": "A1", "status": "available" } ] } ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let readings = client(&server).fetch(&ChargerId::from("NSP-BRI-01")).await;

        assert_eq!(readings, vec![PortReading::new("A1", "available")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_falls_back() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream unavailable")
            .expect(2)
            .create_async()
            .await;

        let client = client(&server);
        let charger = ChargerId::from("NSP-WIN-02");
        match client.query(&charger).await {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert_eq!(client.fetch(&charger).await, sentinel());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_falls_back() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client(&server);
        let charger = ChargerId::from("NSP-MEM-01");
        assert!(matches!(client.query(&charger).await, Err(FetchError::Decode(_))));
        assert_eq!(client.fetch(&charger).await, sentinel());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_falls_back() {
        // Port 9 (discard) is not listening on test hosts
        let client =
            StatusApiClient::new("http://127.0.0.1:9/chargers", Duration::from_secs(2)).unwrap();
        let charger = ChargerId::from("NSP-MIL-01");

        assert!(matches!(client.query(&charger).await, Err(FetchError::Transport(_))));
        assert_eq!(client.fetch(&charger).await, sentinel());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = StatusApiClient::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_charger_url_encodes_filter() {
        let client =
            StatusApiClient::new("https://api.example.com/core/v1/chargers", Duration::from_secs(1))
                .unwrap();
        let url = client.charger_url(&ChargerId::from("NSP-BRI-01"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("filter_eq[name]".to_string(), "NSP-BRI-01".to_string())]);
        assert_eq!(url.path(), "/core/v1/chargers");
    }
}
