//! Configuration loading tests

use std::io::Write;
use tempfile::NamedTempFile;
use turkpost::config::{AppConfig, ConfigError};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config_from_file() {
    let file = write_config(
        r#"
[marketplace]
endpoint = "https://mechanicalturk.example.com/?Service=AWSMechanicalTurkRequester"
version = "2012-03-25"
access_key_env = "MY_ACCESS_KEY"
secret_key_env = "MY_SECRET_KEY"

[poll]
tick_secs = 30

[task]
reward_amount = "0.25"
reward_currency = "USD"
assignment_duration_secs = 120
lifetime_secs = 1200
keywords = ["twitter", "emoji"]
auto_approval_delay_secs = 0
response_group = "Minimal"
"#,
    );

    let config = AppConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.marketplace.access_key_env, "MY_ACCESS_KEY");
    assert_eq!(config.poll.tick_secs, 30);
    assert_eq!(config.task.reward_amount, "0.25");
    assert_eq!(config.task.lifetime_secs, 1200);
}

#[test]
fn test_load_minimal_config_applies_defaults() {
    let file = write_config(
        r#"
[marketplace]
endpoint = "https://mechanicalturk.example.com/"
"#,
    );

    let config = AppConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.marketplace.version, "2012-03-25");
    assert_eq!(config.poll.tick_secs, 60);
    assert_eq!(config.task.assignment_duration_secs, 600);
}

#[test]
fn test_load_rejects_bad_endpoint() {
    let file = write_config(
        r#"
[marketplace]
endpoint = "no scheme here"
"#,
    );

    let result = AppConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidEndpoint { .. })));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let file = write_config("[marketplace\nendpoint=");
    let result = AppConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_load_missing_file_is_a_read_error() {
    let result = AppConfig::load_from_file("/definitely/not/here.toml".as_ref());
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_credentials_resolve_from_environment() {
    let file = write_config(
        r#"
[marketplace]
endpoint = "https://mechanicalturk.example.com/"
access_key_env = "TURKPOST_TEST_ACCESS_KEY"
secret_key_env = "TURKPOST_TEST_SECRET_KEY"
"#,
    );
    let config = AppConfig::load_from_file(file.path()).unwrap();

    std::env::set_var("TURKPOST_TEST_ACCESS_KEY", "AKID");
    std::env::set_var("TURKPOST_TEST_SECRET_KEY", "shh");
    let creds = config.credentials().unwrap();
    std::env::remove_var("TURKPOST_TEST_ACCESS_KEY");
    std::env::remove_var("TURKPOST_TEST_SECRET_KEY");

    assert_eq!(creds.access_key, "AKID");
    assert_eq!(creds.secret_key, "shh");
}
