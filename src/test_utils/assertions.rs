//! Custom assertion helpers for common test patterns

use std::path::Path;

/// Asserts that a path exists and is a directory
pub fn assert_dir_exists<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();
    assert!(
        path.is_dir(),
        "Expected directory to exist at path: {}",
        path.display()
    );
}

/// Asserts that a path does not exist
pub fn assert_not_exists<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();
    assert!(
        !path.exists(),
        "Expected path to not exist, but it does: {}",
        path.display()
    );
}

/// Asserts that an error message contains every expected fragment
pub fn assert_error_contains(error_string: &str, expected_messages: &[&str]) {
    for msg in expected_messages {
        assert!(
            error_string.contains(msg),
            "Expected error to contain '{msg}', but got: {error_string}"
        );
    }
}
