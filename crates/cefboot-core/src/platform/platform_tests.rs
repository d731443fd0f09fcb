#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Resolution of known system strings
// ============================================================================

#[test_case("Mac OS X", "x86_64", PlatformId::MACOSX_AMD64)]
#[test_case("Mac OS X", "aarch64", PlatformId::MACOSX_ARM64)]
#[test_case("Darwin", "arm64", PlatformId::MACOSX_ARM64)]
#[test_case("Linux", "amd64", PlatformId::LINUX_AMD64)]
#[test_case("Linux", "aarch64", PlatformId::LINUX_ARM64)]
#[test_case("Linux", "i686", PlatformId::LINUX_I386)]
#[test_case("Linux", "armv7l", PlatformId::LINUX_ARM)]
#[test_case("GNU/Linux", "arm", PlatformId::LINUX_ARM)]
#[test_case("Windows 10", "x86", PlatformId::WINDOWS_I386)]
#[test_case("Windows 10", "amd64", PlatformId::WINDOWS_AMD64)]
#[test_case("Windows 11", "aarch64", PlatformId::WINDOWS_ARM64)]
#[test_case("linux", "x86_64", PlatformId::LINUX_AMD64)]
#[test_case("macos", "aarch64", PlatformId::MACOSX_ARM64)]
#[test_case("windows", "x86_64", PlatformId::WINDOWS_AMD64)]
fn PlatformId___resolve___maps_known_strings(os: &str, arch: &str, expected: PlatformId) {
    assert_eq!(PlatformId::resolve(os, arch).unwrap(), expected);
}

#[test]
fn PlatformId___resolve___arm64_suffix_is_not_plain_arm() {
    let platform = PlatformId::resolve("Windows 10", "arm64-special").unwrap();

    assert_eq!(platform.arch(), Architecture::Arm64);
    assert_eq!(platform, PlatformId::WINDOWS_ARM64);
}

#[test]
fn PlatformId___resolve___x86_64_is_not_i386() {
    let platform = PlatformId::resolve("Linux", "x86_64").unwrap();

    assert_eq!(platform.arch(), Architecture::Amd64);
}

#[test]
fn PlatformId___resolve___darwin_is_not_windows() {
    let platform = PlatformId::resolve("Darwin", "x86_64").unwrap();

    assert_eq!(platform.os(), OperatingSystem::MacOsx);
}

#[test]
fn PlatformId___resolve___case_insensitive() {
    assert_eq!(
        PlatformId::resolve("LINUX", "AARCH64").unwrap(),
        PlatformId::LINUX_ARM64
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn PlatformId___resolve___unknown_os_carries_raw_strings() {
    let err = PlatformId::resolve("SolarisX", "sparc").unwrap_err();

    match err {
        BootstrapError::UnsupportedPlatform { os_name, os_arch } => {
            assert_eq!(os_name, "SolarisX");
            assert_eq!(os_arch, "sparc");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test_case("Linux", "sparc")]
#[test_case("Linux", "riscv64")]
#[test_case("FreeBSD", "amd64")]
#[test_case("", "")]
fn PlatformId___resolve___unmatched_axis_fails(os: &str, arch: &str) {
    let result = PlatformId::resolve(os, arch);

    assert!(matches!(
        result,
        Err(BootstrapError::UnsupportedPlatform { .. })
    ));
}

#[test_case("Mac OS X", "i386")]
#[test_case("Mac OS X", "arm")]
#[test_case("Windows 10", "armv7")]
fn PlatformId___resolve___combination_without_bundle_fails(os: &str, arch: &str) {
    let result = PlatformId::resolve(os, arch);

    assert!(matches!(
        result,
        Err(BootstrapError::UnsupportedPlatform { .. })
    ));
}

// ============================================================================
// Identifiers
// ============================================================================

#[test_case(PlatformId::LINUX_AMD64, "linux-amd64")]
#[test_case(PlatformId::LINUX_ARM, "linux-arm")]
#[test_case(PlatformId::MACOSX_ARM64, "macosx-arm64")]
#[test_case(PlatformId::WINDOWS_I386, "windows-i386")]
fn PlatformId___identifier___formats_os_and_arch(platform: PlatformId, expected: &str) {
    assert_eq!(platform.identifier(), expected);
    assert_eq!(platform.to_string(), expected);
}

#[test]
fn PlatformId___parse___accepts_every_identifier() {
    for platform in PlatformId::all() {
        assert_eq!(PlatformId::parse(&platform.identifier()), Some(*platform));
    }
}

#[test]
fn PlatformId___parse___rejects_unknown() {
    assert_eq!(PlatformId::parse("macosx-i386"), None);
    assert_eq!(PlatformId::parse("linux-x86_64"), None);
}

#[test]
fn PlatformId___all___returns_nine_platforms() {
    assert_eq!(PlatformId::all().len(), 9);
}

#[test]
fn PlatformId___serde___uses_identifier_string() {
    let json = serde_json::to_string(&PlatformId::LINUX_ARM64).unwrap();
    assert_eq!(json, "\"linux-arm64\"");

    let parsed: PlatformId = serde_json::from_str("\"windows-amd64\"").unwrap();
    assert_eq!(parsed, PlatformId::WINDOWS_AMD64);

    assert!(serde_json::from_str::<PlatformId>("\"beos-ppc\"").is_err());
}

#[test]
fn PlatformId___current___resolves_on_supported_hosts() {
    // Only assert when the host is one of the bundle platforms
    if let Ok(platform) = PlatformId::current() {
        assert_eq!(PlatformId::parse(&platform.identifier()), Some(platform));
    }
}

#[test]
fn OperatingSystem___predicates___match_variant() {
    assert!(OperatingSystem::MacOsx.is_macosx());
    assert!(OperatingSystem::Linux.is_linux());
    assert!(OperatingSystem::Windows.is_windows());
    assert!(!OperatingSystem::Windows.is_linux());
}
