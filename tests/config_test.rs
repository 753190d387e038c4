//! Layered settings loading from a project directory

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use launchpad::config::Settings;

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    launchpad::util::testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".launchpad.toml"),
        r#"
project_name = "demo"
fallback_volumes = ["models"]

[files]
backend = "conf/llm.env"

[urls]
ui = "http://localhost:9000"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(dir.path()).unwrap();

    // Assert
    assert_eq!(settings.project_dir, dir.path());
    assert_eq!(settings.project_name(), "demo");
    assert_eq!(settings.fallback_volume_names(), vec!["demo_models"]);
    assert_eq!(settings.backend_file(), dir.path().join("conf/llm.env"));
    assert_eq!(settings.files.services, PathBuf::from("services.env"));
    assert_eq!(settings.urls.ui, "http://localhost:9000");
    assert_eq!(settings.urls.dispatcher, "http://localhost:5100");
}

#[test]
fn given_broken_local_config_when_load_then_config_error() {
    // Arrange
    launchpad::util::testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".launchpad.toml"), "project_name = [unclosed").unwrap();

    // Act
    let result = Settings::load(dir.path());

    // Assert
    let err = result.unwrap_err();
    assert!(err.to_string().contains(".launchpad.toml"));
}

#[test]
fn given_no_project_name_when_resolving_then_derived_from_directory() {
    // Arrange
    let parent = TempDir::new().unwrap();
    let project = parent.path().join("My AI Stack");
    fs::create_dir(&project).unwrap();
    let settings = Settings {
        project_dir: project,
        ..Settings::default()
    };

    // Act
    let name = settings.project_name();

    // Assert
    assert_eq!(name, "myaistack");
    assert_eq!(
        settings.fallback_volume_names(),
        vec!["myaistack_ollama_data", "myaistack_postgres_data"]
    );
}

#[test]
fn given_configured_name_with_spaces_when_load_then_normalized_for_compose() {
    // Arrange
    launchpad::util::testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".launchpad.toml"), "project_name = \"My Stack\"\n").unwrap();

    // Act
    let settings = Settings::load(dir.path()).unwrap();

    // Assert
    assert_eq!(settings.project_name(), "mystack");
}
