//! Assertion macros for API responses

/// Assert the status of a `(StatusCode, Value)` response, printing the body
/// on mismatch
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        let (status, body) = &$response;
        assert_eq!(*status, $status, "unexpected status, body: {}", body);
    };
}

/// Assert that a validation error body reports `field`
#[macro_export]
macro_rules! assert_field_error {
    ($body:expr, $field:expr) => {
        let details = $body["details"].as_array().cloned().unwrap_or_default();
        assert!(
            details.iter().any(|d| d["field"] == $field),
            "Expected a field error for '{}', got: {}",
            $field,
            $body
        );
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
