//! Verify service requests and response decoding against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector names an operation, its input, the request the client must
//! send, a simulated response, and either the expected result or the
//! expected error. Results are compared as JSON, and only on the keys the
//! vector lists, so unrelated optional fields do not cause false negatives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use hydros_client::models::AmendWellPermitsRequest;
use hydros_client::query::{ProductionQuery, SearchQuery, Sort, SortDirection};
use hydros_client::{
    set_access_token, set_host, set_transport, Client, Error, HttpMethod, HttpRequest,
    HttpResponse, Result, Transport,
};
use serde_json::Value;
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:3000";

/// Records requests and replays queued responses.
#[derive(Default)]
struct Replay {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl Transport for Replay {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Transport("no simulated response".to_string()))
    }
}

fn client(replay: &Arc<Replay>) -> Client {
    let transport: Arc<dyn Transport> = replay.clone();
    Client::new([
        set_host(BASE_URL),
        set_access_token("vector-token"),
        set_transport(transport),
    ])
    .unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn u64_of(input: &Value, key: &str) -> u64 {
    input[key].as_u64().unwrap()
}

fn date_of(input: &Value, key: &str) -> Option<NaiveDate> {
    input[key]
        .as_str()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
}

fn to_value<T: serde::Serialize>(result: Result<T>) -> Result<Value> {
    result.map(|v| serde_json::to_value(v).unwrap())
}

/// Run one operation against `client`, returning its result as JSON.
fn invoke(client: &Client, operation: &str, input: &Value) -> Result<Value> {
    match operation {
        "well.get" => to_value(client.well.get(u64_of(input, "id"))),
        "well.get_wells_by_ids" => {
            let ids: Vec<u64> = serde_json::from_value(input["ids"].clone()).unwrap();
            to_value(client.well.get_wells_by_ids(&ids))
        }
        "well.search" => {
            let sort = input["sort"]
                .as_array()
                .unwrap()
                .iter()
                .map(|pair| {
                    let field = pair[0].as_str().unwrap();
                    let direction: SortDirection =
                        serde_json::from_value(pair[1].clone()).unwrap();
                    match direction {
                        SortDirection::Asc => Sort::asc(field),
                        SortDirection::Desc => Sort::desc(field),
                    }
                })
                .collect();
            let query = SearchQuery {
                query: input["query"].as_str().unwrap().to_string(),
                filters: serde_json::from_value(input["filters"].clone()).unwrap(),
                from: u64_of(input, "from") as u32,
                size: u64_of(input, "size") as u32,
                sort,
            };
            to_value(client.well.search(query))
        }
        "driller.get" => to_value(client.driller.get(u64_of(input, "id"))),
        "meter.list_by_well_id" => to_value(client.meter.list_by_well_id(u64_of(input, "well_id"))),
        "meter_reading.get_production_by_well" => {
            let query = ProductionQuery {
                from_date: date_of(input, "from_date"),
                to_date: date_of(input, "to_date"),
                estimate_bounds: input["estimate_bounds"].as_bool().unwrap(),
            };
            to_value(
                client
                    .meter_reading
                    .get_production_by_well(u64_of(input, "well_id"), query),
            )
        }
        "history.get" => {
            let update_id: Uuid = input["update_id"].as_str().unwrap().parse().unwrap();
            to_value(client.history.get(update_id))
        }
        "permit.amend_well_permits" => {
            let request: AmendWellPermitsRequest =
                serde_json::from_value(input["request"].clone()).unwrap();
            to_value(
                client
                    .permit
                    .amend_well_permits(u64_of(input, "well_id"), request),
            )
        }
        other => panic!("unknown operation: {other}"),
    }
}

/// Every key in `expected` must be present in `actual` with an equal value.
fn assert_subset(name: &str, actual: &Value, expected: &Value) {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            for (key, value) in expected {
                let got = actual
                    .get(key)
                    .unwrap_or_else(|| panic!("{name}: missing key '{key}'"));
                assert_subset(name, got, value);
            }
        }
        (Value::Array(actual), Value::Array(expected)) => {
            assert_eq!(actual.len(), expected.len(), "{name}: array length");
            for (got, want) in actual.iter().zip(expected) {
                assert_subset(name, got, want);
            }
        }
        _ => assert_eq!(actual, expected, "{name}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Requests and decoded results
// ---------------------------------------------------------------------------

#[test]
fn service_test_vectors() {
    let raw = include_str!("../../test-vectors/wells.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Arc::new(Replay::default());
        replay.responses.lock().unwrap().push_back(simulated(case));
        let c = client(&replay);

        let result = invoke(&c, case["operation"].as_str().unwrap(), &case["input"])
            .unwrap_or_else(|e| panic!("{name}: {e}"));

        // Verify request
        let requests = replay.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "{name}: one request");
        let req = &requests[0];
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(
            req.headers,
            vec![
                ("Authorization".to_string(), "Bearer vector-token".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            "{name}: headers"
        );
        match &expected_req["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            body => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
        }

        // Verify parse
        assert_subset(name, &result, &case["expected_result"]);
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Arc::new(Replay::default());
        replay.responses.lock().unwrap().push_back(simulated(case));
        let c = client(&replay);

        let err = invoke(&c, case["operation"].as_str().unwrap(), &case["input"])
            .expect_err(name);
        let expected = &case["expected_error"];
        match expected["kind"].as_str().unwrap() {
            "Remote" => match &err {
                Error::Remote(remote) => {
                    assert_eq!(remote.status() as u64, expected["status"].as_u64().unwrap(), "{name}: status");
                    assert_eq!(err.to_string(), expected["display"].as_str().unwrap(), "{name}: display");
                }
                other => panic!("{name}: expected a remote error, got {other:?}"),
            },
            "Deserialization" => {
                assert!(matches!(err, Error::Deserialization(_)), "{name}: got {err:?}")
            }
            other => panic!("{name}: unknown expected error kind: {other}"),
        }
    }
}
