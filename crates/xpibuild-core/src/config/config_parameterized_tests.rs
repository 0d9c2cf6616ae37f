#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Cross references written into the manifests
// ============================================================================

#[test_case("", "", "update.rdf")]
#[test_case("beta", "", "update-beta.rdf")]
#[test_case("", "dev", "dev/update.rdf")]
#[test_case("trunk", "dev", "dev/update-trunk.rdf")]
fn BuildConfig___update_rdf_reference___combines_dir_and_suffix(
    rdf_suffix: &str,
    xpi_dir: &str,
    expected: &str,
) {
    let config = BuildConfig {
        rdf_suffix: rdf_suffix.into(),
        xpi_dir: xpi_dir.into(),
        ..BuildConfig::default()
    };

    assert_eq!(config.update_rdf_reference(), expected);
}

#[test_case("build", "", "zotero-build.xpi")]
#[test_case("4.0.1", "", "zotero-4.0.1.xpi")]
#[test_case("", "", "zotero.xpi")]
#[test_case("trunk", "dev", "dev/zotero-trunk.xpi")]
fn BuildConfig___xpi_reference___combines_dir_and_suffix(
    xpi_suffix: &str,
    xpi_dir: &str,
    expected: &str,
) {
    let config = BuildConfig {
        xpi_suffix: xpi_suffix.into(),
        xpi_dir: xpi_dir.into(),
        ..BuildConfig::default()
    };

    assert_eq!(config.xpi_reference(), expected);
}

// ============================================================================
// Published artifact names
// ============================================================================

#[test_case("build", "zotero-build.xpi", "update-build.rdf")]
#[test_case("beta", "zotero-beta.xpi", "update-beta.rdf")]
#[test_case("", "zotero.xpi", "update.rdf")]
fn BuildConfig___output_names___use_build_suffix(
    build_suffix: &str,
    expected_xpi: &str,
    expected_rdf: &str,
) {
    let config = BuildConfig {
        build_suffix: build_suffix.into(),
        ..BuildConfig::default()
    };

    assert_eq!(config.output_xpi_name(), expected_xpi);
    assert_eq!(config.output_update_name(), expected_rdf);
}

#[test_case("release", true)]
#[test_case("beta", false)]
#[test_case("dev", false)]
#[test_case("Release", false)]
fn BuildConfig___is_release___matches_exact_channel(channel: &str, expected: bool) {
    let config = BuildConfig {
        channel: channel.into(),
        ..BuildConfig::default()
    };

    assert_eq!(config.is_release(), expected);
}
