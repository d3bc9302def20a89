//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use palette_pilot::models::Color;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is Accepted (202) with the JSON acknowledgement
pub fn assert_accepted(response: &TestResponse) {
    assert_status(response, StatusCode::ACCEPTED);
    assert_json_status(response, 202);
}

/// Assert JSON response has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert a JSON error body with the given status and message fragment
pub fn assert_api_error(response: &TestResponse, expected: StatusCode, fragment: &str) {
    assert_status(response, expected);
    assert_json_status(response, expected.as_u16());
    let json: serde_json::Value = response.json();
    let message = json["error"].as_str().unwrap_or_default();
    assert!(
        message.contains(fragment),
        "Expected error containing {fragment:?}, got {message:?}"
    );
}

/// Canonical hex strings of a palette
pub fn hexes(colors: &[Color]) -> Vec<String> {
    colors.iter().map(|c| c.to_hex()).collect()
}
