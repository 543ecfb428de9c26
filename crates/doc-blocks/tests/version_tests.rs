//! Integration tests for template version handling.

use doc_blocks::{Version, VersionError, parse_version, validate_version};
use rstest::rstest;

#[rstest]
#[case("1.2", "1.3", "2.0")]
#[case("1.2.5", "1.3.0", "2.0.0")]
#[case("0.9", "0.10", "1.0")]
#[case("'4.0.1'", "4.1.0", "5.0.0")]
fn test_increments_keep_shape(#[case] raw: &str, #[case] minor: &str, #[case] major: &str) {
    let version = parse_version(Some(raw)).unwrap();
    assert_eq!(version.increment_minor().to_string(), minor);
    assert_eq!(version.increment_major().to_string(), major);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
#[case(Some("''"))]
fn test_missing_version_defaults(#[case] raw: Option<&str>) {
    assert_eq!(parse_version(raw).unwrap().to_string(), "1.0");
}

#[rstest]
#[case("1")]
#[case("1.")]
#[case(".1")]
#[case("1.2.3.4")]
#[case("a.b")]
#[case("1.2 beta")]
fn test_malformed_versions_rejected(#[case] raw: &str) {
    assert_eq!(
        validate_version(raw),
        Err(VersionError::Malformed {
            raw: raw.to_string()
        })
    );
    assert!(parse_version(Some(raw)).is_err());
}

#[test]
fn test_empty_is_distinct_from_malformed() {
    let empty = validate_version("").unwrap_err();
    let malformed = validate_version("x").unwrap_err();
    assert_eq!(empty, VersionError::Empty);
    assert!(empty.to_string().contains("required"));
    assert!(malformed.to_string().contains("'x'"));
}

#[test]
fn test_from_str_and_ordering() {
    let older: Version = "1.9.9".parse().unwrap();
    let newer: Version = "1.10".parse().unwrap();
    assert!(older < newer);
    assert_eq!(semver::Version::from(&newer), semver::Version::new(1, 10, 0));
}
