#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized error code mapping tests
// ============================================================================

#[test_case(
    BootstrapError::UnsupportedPlatform {
        os_name: "a".into(),
        os_arch: "b".into(),
    },
    1,
    "UnsupportedPlatform"
)]
#[test_case(
    BootstrapError::InstallDirectory {
        path: PathBuf::from("x"),
        source: std::io::Error::other("x"),
    },
    2,
    "InstallDirectory"
)]
#[test_case(
    BootstrapError::Extraction { source: std::io::Error::other("x") },
    3,
    "Extraction"
)]
#[test_case(BootstrapError::UnsafeEntryPath("../x".into()), 4, "UnsafeEntryPath")]
#[test_case(BootstrapError::MissingResource("x".into()), 5, "MissingResource")]
#[test_case(BootstrapError::InitializationFailed("x".into()), 6, "InitializationFailed")]
#[test_case(BootstrapError::ConfigError("x".into()), 7, "ConfigError")]
#[test_case(BootstrapError::SerializationError("x".into()), 8, "SerializationError")]
#[test_case(BootstrapError::WaitTimeout(Duration::from_secs(1)), 9, "WaitTimeout")]
#[test_case(
    BootstrapError::BuildFailed(Arc::new(BootstrapError::ConfigError("x".into()))),
    10,
    "BuildFailed"
)]
#[test_case(BootstrapError::Io(std::io::Error::other("x")), 11, "Io")]
fn BootstrapError___variant___maps_to_correct_code(
    error: BootstrapError,
    expected_code: u32,
    variant_name: &str,
) {
    assert_eq!(
        error.error_code(),
        expected_code,
        "{} should map to code {}",
        variant_name,
        expected_code
    );
}

// ============================================================================
// Parameterized display prefix tests
// ============================================================================

#[test_case(BootstrapError::MissingResource("r".into()), "missing resource: r")]
#[test_case(BootstrapError::InitializationFailed("r".into()), "initialization failed: r")]
#[test_case(BootstrapError::ConfigError("r".into()), "configuration error: r")]
#[test_case(BootstrapError::UnsafeEntryPath("../r".into()), "unsafe archive entry path: ../r")]
fn BootstrapError___display___formats_message(error: BootstrapError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}
