#![allow(non_snake_case)]

use super::*;

#[test]
fn BuildConfig___default___describes_standard_release_build() {
    let config = BuildConfig::default();

    assert_eq!(config.branch, "master");
    assert_eq!(config.channel, "release");
    assert_eq!(config.xpi_suffix, "build");
    assert_eq!(config.rdf_suffix, "");
    assert_eq!(config.xpi_dir, "");
    assert_eq!(config.build_suffix, "build");
    assert_eq!(config.repo_url, DEFAULT_REPO_URL);
    assert_eq!(config.build_dir, PathBuf::from("build"));
    assert!(config.is_release());
}

#[test]
fn BuildConfig___from_toml_str___keeps_defaults_for_absent_keys() {
    let toml = r#"
channel = "beta"
rdf_suffix = "beta"
"#;

    let config = BuildConfig::from_toml_str(toml).unwrap();

    assert_eq!(config.channel, "beta");
    assert_eq!(config.rdf_suffix, "beta");
    assert_eq!(config.branch, "master");
    assert_eq!(config.build_suffix, "build");
}

#[test]
fn BuildConfig___from_toml_str___rejects_unknown_keys() {
    let result = BuildConfig::from_toml_str("chanel = \"beta\"");

    assert!(matches!(result, Err(BuildError::Config(_))));
}

#[test]
fn BuildConfig___from_file___missing_file___returns_io_error() {
    let result = BuildConfig::from_file("/nonexistent/xpibuild.toml");

    assert!(matches!(result, Err(BuildError::Io(_))));
}

#[test]
fn BuildConfig___from_file___reads_paths() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("xpibuild.toml");
    std::fs::write(&path, "build_dir = \"/srv/xpi\"\ntmp_dir = \"/var/tmp\"\n").unwrap();

    let config = BuildConfig::from_file(&path).unwrap();

    assert_eq!(config.build_dir, PathBuf::from("/srv/xpi"));
    assert_eq!(config.tmp_dir, PathBuf::from("/var/tmp"));
}

#[test]
fn BuildConfig___validate___accepts_defaults() {
    assert!(BuildConfig::default().validate().is_ok());
}

#[test]
fn BuildConfig___validate___rejects_empty_channel() {
    let config = BuildConfig {
        channel: "".into(),
        ..BuildConfig::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn BuildConfig___validate___rejects_suffix_with_separator() {
    let config = BuildConfig {
        build_suffix: "../escape".into(),
        ..BuildConfig::default()
    };

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("build suffix"));
}

#[test]
fn BuildConfig___source_dir___lives_under_build_dir() {
    let config = BuildConfig {
        build_dir: PathBuf::from("/srv/build"),
        ..BuildConfig::default()
    };

    assert_eq!(config.source_dir(), PathBuf::from("/srv/build/zotero"));
}

#[test]
fn BuildConfigOverrides___apply___only_replaces_set_fields() {
    let base = BuildConfig {
        channel: "beta".into(),
        ..BuildConfig::default()
    };
    let overrides = BuildConfigOverrides {
        branch: Some("4.0".into()),
        build_dir: Some(PathBuf::from("/out")),
        ..BuildConfigOverrides::default()
    };

    let config = overrides.apply(base);

    assert_eq!(config.branch, "4.0");
    assert_eq!(config.channel, "beta");
    assert_eq!(config.build_dir, PathBuf::from("/out"));
}

#[test]
fn BuildConfigOverrides___apply___empty_string_clears_suffix() {
    let overrides = BuildConfigOverrides {
        xpi_suffix: Some(String::new()),
        ..BuildConfigOverrides::default()
    };

    let config = overrides.apply(BuildConfig::default());

    assert_eq!(config.xpi_reference(), "zotero.xpi");
}
