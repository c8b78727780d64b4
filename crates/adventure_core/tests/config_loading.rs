use adventure_core::{load_config, AppConfig, ConfigError, UnfilteredPolicy};
use std::fs;
use std::path::PathBuf;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = load_config(dir.path().join("absent.toml")).expect("load config");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn full_file_overrides_every_section() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("adventure.toml");
    let log_dir = dir.path().join("logs");
    fs::write(
        &path,
        format!(
            r#"
[chips]
visible_limit = 8

[radius]
options_miles = [10, 25]

[catalog]
unfiltered = "return_none"

[logging]
level = "warn"
dir = "{}"
"#,
            log_dir.display().to_string().replace('\\', "\\\\")
        ),
    )
    .expect("write config file");

    let config = load_config(&path).expect("load config");
    assert_eq!(config.chips.visible_limit, 8);
    assert_eq!(config.radius.options_miles, vec![10, 25]);
    assert!(config.is_radius_option(25));
    assert!(!config.is_radius_option(50));
    assert_eq!(config.catalog.unfiltered, UnfilteredPolicy::ReturnNone);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.dir, Some(PathBuf::from(&log_dir)));
}

#[test]
fn malformed_and_invalid_files_are_distinguished() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let malformed = dir.path().join("malformed.toml");
    fs::write(&malformed, "[chips\nvisible_limit = 8\n").expect("write config file");
    assert!(matches!(
        load_config(&malformed),
        Err(ConfigError::Parse(_))
    ));

    let wrong_type = dir.path().join("wrong_type.toml");
    fs::write(&wrong_type, "[catalog]\nunfiltered = \"sometimes\"\n").expect("write config file");
    assert!(matches!(
        load_config(&wrong_type),
        Err(ConfigError::Parse(_))
    ));

    let invalid = dir.path().join("invalid.toml");
    fs::write(&invalid, "[chips]\nvisible_limit = 0\n").expect("write config file");
    let err = load_config(&invalid).expect_err("config must fail to load");
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("visible_limit"));
}

#[test]
fn unreadable_path_is_a_read_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    // A directory exists but cannot be read as a file.
    let err = load_config(dir.path()).expect_err("config must fail to load");
    assert!(matches!(err, ConfigError::Read { .. }));
}
