// tests/config_test.rs
use pkg_release::config::{load_config, Config, CONFIG_FILE_NAME};
use serial_test::serial;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.manifest, Path::new("package.json"));
    assert_eq!(config.prerelease_label, "rc");
    assert_eq!(
        config.commands.publish,
        vec!["npm publish --access public".to_string()]
    );
    assert!(!config.publish.otp_prompt);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
prerelease_label = "beta"

[commands]
publish = ["npm publish --access public --tag beta"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.prerelease_label, "beta");
    assert_eq!(
        config.commands.publish,
        vec!["npm publish --access public --tag beta".to_string()]
    );
    // Untouched steps keep their defaults
    assert_eq!(config.commands.build, vec!["npm run build".to_string()]);
    // Root defaults to the directory holding the file
    assert_eq!(config.root_dir(), temp_file.path().parent().unwrap());
}

#[test]
#[serial]
fn test_fixture_file() {
    let config = load_config(Some(Path::new("tests/fixtures/pkg-release.toml")))
        .expect("Failed to load test config");
    assert_eq!(config.prerelease_label, "next");
    assert_eq!(config.exit_delay_ms, 0);
    assert!(config.publish.otp_prompt);
    assert_eq!(
        config.manifest_path(),
        Path::new("tests/fixtures").join("types/package.json")
    );
    assert_eq!(config.commands.commit.len(), 2);
}

#[test]
fn test_relative_root_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("release.toml");
    std::fs::write(&path, "root = \"packages/types\"\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.root_dir(), dir.path().join("packages/types"));
    assert_eq!(
        config.manifest_path(),
        dir.path().join("packages/types/package.json")
    );
}

#[test]
fn test_missing_file_is_config_error() {
    let err = load_config(Some(Path::new("tests/fixtures/does-not-exist.toml"))).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"commands = 12").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().contains("cannot parse"));
}

#[test]
fn test_invalid_label_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"prerelease_label = \"\"").unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path())).is_err());
}

#[test]
#[serial]
fn test_local_config_file_is_found() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "prerelease_label = \"alpha\"\n",
    )
    .unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(previous).unwrap();

    let config = config.unwrap();
    assert_eq!(config.prerelease_label, "alpha");
    assert_eq!(config.root_dir(), Path::new("."));
}
