//! Verify the codec and build/parse methods against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use admin_core::{
    ApiRequestParams, ApiResponse, HttpMethod, HttpRequest, HttpResponse, PrimaryKey, Resource,
    ResourceClient, ResourceError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: i64,
    name: String,
}

impl Resource for User {
    const RESOURCE_PATH: &'static str = "users";
    const PRIMARY_KEY_FIELD: &'static str = "id";
}

fn client() -> ResourceClient<User> {
    ResourceClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn pk(case: &Value) -> PrimaryKey {
    case["input_pk"].as_i64().unwrap().into()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    if let Some(query) = expected.get("query") {
        assert_eq!(req.query, pairs(query), "{name}: query");
    }
    if let Some(headers) = expected.get("headers") {
        assert_eq!(req.headers, pairs(headers), "{name}: headers");
    }
    match expected.get("body") {
        Some(body) => {
            let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&actual, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: ResourceError, expected: &str) {
    match expected.split_once(':') {
        Some(("Http", status)) => {
            let status: u16 = status.parse().unwrap();
            assert!(
                matches!(err, ResourceError::Http { status: s, .. } if s == status),
                "{name}: expected Http {status}, got {err:?}"
            );
        }
        None if expected == "NotFound" => {
            assert!(matches!(err, ResourceError::NotFound { .. }), "{name}: expected NotFound")
        }
        _ => panic!("{name}: unknown expected_error: {expected}"),
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

#[test]
fn params_test_vectors() {
    let raw = include_str!("../../test-vectors/params.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params: ApiRequestParams = serde_json::from_value(case["input"].clone()).unwrap();
        assert_eq!(params.to_query_pairs(), pairs(&case["expected_query"]), "{name}");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params: ApiRequestParams = serde_json::from_value(case["params"].clone()).unwrap();

        let req = c.build_get_items(&params);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_items(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: ApiResponse<User> =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pk = pk(case);

        let req = c.build_get_by_pk(&pk);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_by_pk(&pk, simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_item(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let created = c.parse_create_item(simulated(case)).unwrap();
        let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(created, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let raw = include_str!("../../test-vectors/update.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_item(&pk(case), &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let updated = c.parse_update_item(simulated(case)).unwrap();
        let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(updated, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = c.build_delete_item(&pk(case));
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_item(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected = case["expected_result"].as_bool().unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: confirmation");
        }
    }
}
