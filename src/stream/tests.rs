//! Tests for entity streams

use super::*;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::http::PageFetcher;
use crate::types::StringMap;
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use test_case::test_case;

const BASE: &str = "https://api.usvotefoundation.org/eod/v3/";

// ============================================================================
// Scripted fetcher
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Call {
    path: String,
    query: StringMap,
    headers: StringMap,
}

#[derive(Default)]
struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Result<Value>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(
        &self,
        path: &str,
        query: &StringMap,
        headers: &StringMap,
    ) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            query: query.clone(),
            headers: headers.clone(),
        });
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::decode("no more scripted pages")))
    }

    async fn probe(&self, _path: &str, _headers: &StringMap) -> Result<u16> {
        Ok(200)
    }
}

fn config(value: Value) -> Arc<SourceConfig> {
    Arc::new(SourceConfig::from_value(&value).unwrap())
}

fn params(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn ids(records: &[Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

// ============================================================================
// Definition Tests
// ============================================================================

#[test_case(EntityKind::States, "states" ; "states")]
#[test_case(EntityKind::Regions, "regions" ; "regions")]
#[test_case(EntityKind::Offices, "offices" ; "offices")]
#[test_case(EntityKind::Officials, "officials" ; "officials")]
fn test_root_path(kind: EntityKind, expected: &str) {
    let stream = EntityStream::new(kind, config(json!({})), BASE);
    assert_eq!(stream.name(), expected);
    assert_eq!(stream.path(None), expected);
    assert_eq!(stream.definition().primary_key, "id");
}

#[test]
fn test_entity_kind_from_name() {
    assert_eq!(EntityKind::from_name("states").unwrap(), EntityKind::States);
    assert_eq!(EntityKind::from_name(" Officials ").unwrap(), EntityKind::Officials);
    assert!(matches!(
        EntityKind::from_name("precincts"),
        Err(Error::StreamNotFound { .. })
    ));
}

#[test]
fn test_entity_kind_order_and_display() {
    let names: Vec<String> = EntityKind::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["states", "regions", "offices", "officials"]);
}

// ============================================================================
// Request Building Tests
// ============================================================================

#[test]
fn test_path_uses_token_verbatim() {
    let stream = EntityStream::new(EntityKind::Regions, config(json!({})), BASE);
    assert_eq!(
        stream.path(Some("regions?limit=20&offset=20")),
        "regions?limit=20&offset=20"
    );
}

#[test]
fn test_regions_params_whitelisted() {
    let stream = EntityStream::new(
        EntityKind::Regions,
        config(json!({"api_key": "k", "county": "X", "state": "Y", "unrelated": "Z"})),
        BASE,
    );

    assert_eq!(
        stream.query_params(None),
        params(&[("county", "X"), ("state", "Y")])
    );
}

#[test]
fn test_regions_all_keys() {
    let stream = EntityStream::new(
        EntityKind::Regions,
        config(json!({
            "state": "1",
            "state_abbr": "AL",
            "county": "2",
            "county_name": "Autauga",
            "municipality": "3",
            "municipality_name": "Prattville",
            "municipality_type": "City",
            "region_name": "Autauga County",
            "region_id": "99",
            "office_id": "5"
        })),
        BASE,
    );

    let query = stream.query_params(None);
    assert_eq!(query.len(), 8);
    assert!(!query.contains_key("region_id"));
    assert!(!query.contains_key("office_id"));
}

#[test]
fn test_states_never_take_params() {
    let stream = EntityStream::new(
        EntityKind::States,
        config(json!({"state": "1", "county": "2", "region_id": "3"})),
        BASE,
    );
    assert!(stream.query_params(None).is_empty());
}

#[test]
fn test_offices_params() {
    let stream = EntityStream::new(
        EntityKind::Offices,
        config(json!({"region_id": 12, "state": "1"})),
        BASE,
    );
    assert_eq!(stream.query_params(None), params(&[("region_id", "12")]));
}

#[test]
fn test_officials_params() {
    let stream = EntityStream::new(
        EntityKind::Officials,
        config(json!({"office_id": "4", "office_type": "Election", "region_id": "1"})),
        BASE,
    );
    assert_eq!(
        stream.query_params(None),
        params(&[("office_id", "4"), ("office_type", "Election")])
    );
}

#[test]
fn test_no_defaults_for_missing_keys() {
    let stream = EntityStream::new(EntityKind::Officials, config(json!({"api_key": "k"})), BASE);
    assert!(stream.query_params(None).is_empty());
}

#[test]
fn test_state_id_equivalent_to_state() {
    let legacy = EntityStream::new(EntityKind::Regions, config(json!({"state_id": "5"})), BASE);
    let current = EntityStream::new(EntityKind::Regions, config(json!({"state": "5"})), BASE);

    assert_eq!(legacy.query_params(None), current.query_params(None));
    assert_eq!(legacy.query_params(None), params(&[("state", "5")]));
}

#[test_case(EntityKind::States ; "states")]
#[test_case(EntityKind::Regions ; "regions")]
#[test_case(EntityKind::Offices ; "offices")]
#[test_case(EntityKind::Officials ; "officials")]
fn test_token_clears_params(kind: EntityKind) {
    let stream = EntityStream::new(
        kind,
        config(json!({
            "state": "1",
            "county": "2",
            "region_id": "3",
            "office_id": "4",
            "office_type": "Election"
        })),
        BASE,
    );
    assert!(stream.query_params(Some("anything?page=2")).is_empty());
}

#[test]
fn test_auth_headers() {
    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "abc"})), BASE);
    assert_eq!(
        stream.auth_headers().unwrap(),
        params(&[("Authorization", "OAuth abc")])
    );
}

#[test]
fn test_parse_page_and_next_token() {
    let stream = EntityStream::new(EntityKind::States, config(json!({})), BASE);
    let page = json!({
        "meta": {"next": format!("{BASE}states?page=2")},
        "objects": [{"id": 1}]
    });

    assert_eq!(
        stream.next_token(&page).unwrap(),
        Some("states?page=2".to_string())
    );
    assert_eq!(stream.parse_page(page), vec![json!({"id": 1})]);
}

// ============================================================================
// Read Loop Tests
// ============================================================================

#[tokio::test]
async fn test_two_page_scenario() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(json!({
            "objects": [{"id": 1}, {"id": 2}],
            "meta": {"next": format!("{BASE}states?page=2")}
        })),
        Ok(json!({"objects": [{"id": 3}], "meta": {"next": null}})),
    ]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "k"})), BASE);
    let records: Vec<Value> = stream
        .records(fetcher.clone())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&records), vec![1, 2, 3]);

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "states");
    assert_eq!(calls[1].path, "states?page=2");
    for call in &calls {
        assert_eq!(
            call.headers.get("Authorization"),
            Some(&"OAuth k".to_string())
        );
    }
}

#[tokio::test]
async fn test_filters_only_on_first_request() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(json!({
            "objects": [{"id": 10}],
            "meta": {"next": format!("{BASE}regions?county=X&offset=1")}
        })),
        Ok(json!({"objects": [{"id": 11}], "meta": {"next": null}})),
    ]);

    let stream = EntityStream::new(
        EntityKind::Regions,
        config(json!({"api_key": "k", "county": "X"})),
        BASE,
    );
    let records: Vec<Value> = stream
        .records(fetcher.clone())
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(ids(&records), vec![10, 11]);

    let calls = fetcher.calls();
    assert_eq!(calls[0].query, params(&[("county", "X")]));
    assert_eq!(calls[1].path, "regions?county=X&offset=1");
    assert!(calls[1].query.is_empty());
}

#[tokio::test]
async fn test_single_page_without_meta() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({"objects": [{"id": 1}]}))]);

    let stream = EntityStream::new(EntityKind::Offices, config(json!({"api_key": "k"})), BASE);
    let records: Vec<Value> = stream
        .records(fetcher.clone())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&records), vec![1]);
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_page_still_fetched_once() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({"meta": {"next": null}}))]);

    let stream = EntityStream::new(EntityKind::Officials, config(json!({"api_key": "k"})), BASE);
    let records: Vec<Value> = stream
        .records(fetcher.clone())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_middle_page_continues() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(json!({"objects": [], "meta": {"next": format!("{BASE}states?page=2")}})),
        Ok(json!({"objects": [{"id": 5}], "meta": {"next": null}})),
    ]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "k"})), BASE);
    let records: Vec<Value> = stream
        .records(fetcher.clone())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&records), vec![5]);
    assert_eq!(fetcher.calls().len(), 2);
}

#[test]
fn test_missing_api_key_fails_before_request() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({"objects": [{"id": 1}]}))]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"state": "1"})), BASE);
    let result = stream.records(fetcher.clone());

    assert!(matches!(result, Err(Error::MissingConfigField { .. })));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_error_ends_stream() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(json!({"objects": [{"id": 1}], "meta": {"next": format!("{BASE}states?page=2")}})),
        Err(Error::http_status(500, "boom")),
    ]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "k"})), BASE);
    let mut records = stream.records(fetcher.clone()).unwrap();

    assert_eq!(records.try_next().await.unwrap(), Some(json!({"id": 1})));
    assert!(matches!(
        records.try_next().await,
        Err(Error::HttpStatus { status: 500, .. })
    ));
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_foreign_next_link_emits_page_then_fails() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({
        "objects": [{"id": 1}, {"id": 2}],
        "meta": {"next": "https://elsewhere.example.org/states?page=2"}
    }))]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "k"})), BASE);
    let mut records = stream.records(fetcher.clone()).unwrap();

    assert_eq!(records.try_next().await.unwrap(), Some(json!({"id": 1})));
    assert_eq!(records.try_next().await.unwrap(), Some(json!({"id": 2})));
    assert!(matches!(
        records.try_next().await,
        Err(Error::Pagination { .. })
    ));
    assert_eq!(fetcher.calls().len(), 1);
}

#[test]
fn test_records_are_lazy() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({"objects": [{"id": 1}]}))]);

    let stream = EntityStream::new(EntityKind::States, config(json!({"api_key": "k"})), BASE);
    let records = stream.records(fetcher.clone()).unwrap();
    assert!(fetcher.calls().is_empty());

    let collected: Vec<Value> = tokio_test::block_on(records.try_collect()).unwrap();
    assert_eq!(ids(&collected), vec![1]);
    assert_eq!(fetcher.calls().len(), 1);
}
