#![allow(non_snake_case)]

use super::*;

#[test]
fn BuildError___missing_directory___displays_path() {
    let err = BuildError::MissingDirectory(PathBuf::from("/tmp/zotero/chrome"));

    assert_eq!(err.to_string(), "directory not found: /tmp/zotero/chrome");
}

#[test]
fn BuildError___command_failed___displays_command_and_code() {
    let err = BuildError::CommandFailed {
        command: "git pull".into(),
        code: Some(128),
    };

    assert_eq!(err.to_string(), "`git pull` failed with exit code 128");
}

#[test]
fn BuildError___command_failed_without_code___displays_none() {
    let err = BuildError::CommandFailed {
        command: "git clone".into(),
        code: None,
    };

    assert_eq!(err.to_string(), "`git clone` failed with exit code none");
}

#[test]
fn BuildError___invalid_metadata___names_offending_file() {
    let err = BuildError::InvalidMetadata {
        path: PathBuf::from("translators/Broken.js"),
        reason: "metadata block not found".into(),
    };

    let display = err.to_string();

    assert!(display.contains("translators/Broken.js"));
    assert!(display.contains("metadata block not found"));
}

#[test]
fn BuildError___invalid_revision_counter___quotes_content() {
    let err = BuildError::InvalidRevisionCounter {
        path: PathBuf::from("build/lastrev-4.0.1"),
        content: "abc".into(),
    };

    assert_eq!(
        err.to_string(),
        "invalid revision counter in build/lastrev-4.0.1: \"abc\""
    );
}

#[test]
fn BuildError___io_at___prefixes_path_and_keeps_kind() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");

    let err = BuildError::io_at(Path::new("/tmp/x"), io_err);

    match err {
        BuildError::Io(inner) => {
            assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
            assert_eq!(inner.to_string(), "/tmp/x: gone");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn BuildError___from_toml_error___becomes_config_error() {
    let toml_err = toml::from_str::<toml::Value>("not = = toml").unwrap_err();

    let err: BuildError = toml_err.into();

    assert!(matches!(err, BuildError::Config(_)));
}
