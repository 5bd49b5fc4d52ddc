use conventional_release::config::{Config, FloatingTagMode};
use serial_test::serial;
use std::env;

fn clear_inputs() {
    for name in [
        "INPUT_GITHUB-TOKEN",
        "INPUT_TAG-PREFIX",
        "INPUT_INITIAL-VERSION",
        "INPUT_FLOATING-TAG",
        "INPUT_CREATE-RELEASE",
        "INPUT_PRE-RELEASE-COMMAND",
        "INPUT_DEFAULT-BRANCH",
        "GITHUB_REPOSITORY",
        "GITHUB_API_URL",
        "GITHUB_WORKSPACE",
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_defaults_with_only_required_inputs() {
    clear_inputs();
    env::set_var("INPUT_GITHUB-TOKEN", "secret");
    env::set_var("GITHUB_REPOSITORY", "octo/repo");

    let config = Config::from_env().unwrap();
    assert_eq!(config.token, "secret");
    assert_eq!(config.repository, "octo/repo");
    assert_eq!(config.tag_prefix, "v");
    assert_eq!(config.initial_version, "0.0.0");
    assert_eq!(config.floating_tag, FloatingTagMode::Major);
    assert!(!config.create_release);
    assert!(config.pre_release_command.is_none());
    assert_eq!(config.api_url, "https://api.github.com");

    clear_inputs();
}

#[test]
#[serial]
fn test_missing_token_fails() {
    clear_inputs();
    env::set_var("GITHUB_REPOSITORY", "octo/repo");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("github-token"));

    clear_inputs();
}

#[test]
#[serial]
fn test_missing_repository_fails() {
    clear_inputs();
    env::set_var("INPUT_GITHUB-TOKEN", "secret");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("GITHUB_REPOSITORY"));

    clear_inputs();
}

#[test]
#[serial]
fn test_all_inputs_respected() {
    clear_inputs();
    env::set_var("INPUT_GITHUB-TOKEN", "secret");
    env::set_var("GITHUB_REPOSITORY", "octo/repo");
    env::set_var("INPUT_TAG-PREFIX", "release-");
    env::set_var("INPUT_INITIAL-VERSION", "1.0.0");
    env::set_var("INPUT_FLOATING-TAG", "major+minor");
    env::set_var("INPUT_CREATE-RELEASE", "yes");
    env::set_var("INPUT_PRE-RELEASE-COMMAND", "make changelog");
    env::set_var("INPUT_DEFAULT-BRANCH", "trunk");
    env::set_var("GITHUB_API_URL", "https://ghe.example.test/api/v3");

    let config = Config::from_env().unwrap();
    assert_eq!(config.tag_prefix, "release-");
    assert_eq!(config.initial_version, "1.0.0");
    assert_eq!(config.floating_tag, FloatingTagMode::MajorMinor);
    assert!(config.create_release);
    assert_eq!(config.pre_release_command.as_deref(), Some("make changelog"));
    assert_eq!(config.default_branch.as_deref(), Some("trunk"));
    assert_eq!(config.api_url, "https://ghe.example.test/api/v3");

    clear_inputs();
}

#[test]
#[serial]
fn test_empty_input_treated_as_absent() {
    clear_inputs();
    env::set_var("INPUT_GITHUB-TOKEN", "secret");
    env::set_var("GITHUB_REPOSITORY", "octo/repo");
    env::set_var("INPUT_TAG-PREFIX", "");
    env::set_var("INPUT_PRE-RELEASE-COMMAND", "  ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.tag_prefix, "v");
    assert!(config.pre_release_command.is_none());

    clear_inputs();
}

#[test]
#[serial]
fn test_floating_tag_off() {
    clear_inputs();
    env::set_var("INPUT_GITHUB-TOKEN", "secret");
    env::set_var("GITHUB_REPOSITORY", "octo/repo");
    env::set_var("INPUT_FLOATING-TAG", "off");

    let config = Config::from_env().unwrap();
    assert_eq!(config.floating_tag, FloatingTagMode::Off);

    clear_inputs();
}
