//! Unit tests for TOML configuration parsing and validation.

use star_relay::config::GlobalConfig;

const SAMPLE: &str = r#"
poll_interval_seconds = 120
request_timeout_seconds = 10

[slack]
team_domain = "example"

[asana]
workspace_id = "1111"
assignee_id = "2222"
project_id = "3333"
"#;

const MINIMAL: &str = r#"
[slack]
team_domain = "example"

[asana]
workspace_id = "1111"
assignee_id = "2222"
project_id = "3333"
"#;

#[test]
fn parses_valid_config() {
    let config = GlobalConfig::from_toml_str(SAMPLE).expect("config parses");

    assert_eq!(config.slack.team_domain, "example");
    assert_eq!(config.asana.workspace_id, "1111");
    assert_eq!(config.asana.assignee_id, "2222");
    assert_eq!(config.asana.project_id, "3333");
    assert_eq!(config.poll_interval_seconds, 120);
    assert_eq!(config.request_timeout_seconds, 10);
}

#[test]
fn interval_and_timeout_have_defaults() {
    let config = GlobalConfig::from_toml_str(MINIMAL).expect("config parses");

    assert_eq!(config.poll_interval_seconds, 60);
    assert_eq!(config.request_timeout_seconds, 30);
    assert_eq!(config.poll_interval().as_secs(), 60);
    assert_eq!(config.request_timeout().as_secs(), 30);
}

#[test]
fn tokens_are_never_read_from_toml() {
    // A stray token key in the file must not populate the credential
    // fields; they are runtime-only.
    let toml = SAMPLE.replace(
        "team_domain = \"example\"",
        "team_domain = \"example\"\ntoken = \"xoxp-leaked\"",
    );
    let result = GlobalConfig::from_toml_str(&toml);

    // serde(skip) + deny_unknown_fields is not used, so the key is
    // ignored rather than rejected; the field stays empty either way.
    let config = result.expect("config parses");
    assert!(config.slack.token.is_empty());
}

#[test]
fn rejects_invalid_toml() {
    let result = GlobalConfig::from_toml_str("not = [valid");
    assert!(result.is_err());
}

#[test]
fn rejects_missing_asana_section() {
    let toml = r#"
[slack]
team_domain = "example"
"#;
    assert!(GlobalConfig::from_toml_str(toml).is_err());
}

#[test]
fn rejects_empty_team_domain() {
    let toml = MINIMAL.replace("team_domain = \"example\"", "team_domain = \"\"");
    let err = GlobalConfig::from_toml_str(&toml).expect_err("empty domain rejected");
    assert!(err.to_string().contains("slack.team_domain"));
}

#[test]
fn rejects_empty_routing_ids() {
    for field in ["workspace_id", "assignee_id", "project_id"] {
        let toml = MINIMAL.replace(
            &format!("{field} = \""),
            &format!("{field} = \"\" # was \""),
        );
        let err = GlobalConfig::from_toml_str(&toml).expect_err("empty id rejected");
        assert!(
            err.to_string().contains(field),
            "error should name {field}: {err}"
        );
    }
}

#[test]
fn rejects_zero_poll_interval() {
    let toml = format!("poll_interval_seconds = 0\n{MINIMAL}");
    let err = GlobalConfig::from_toml_str(&toml).expect_err("zero interval rejected");
    assert!(err.to_string().contains("poll_interval_seconds"));
}

#[test]
fn rejects_zero_request_timeout() {
    let toml = format!("request_timeout_seconds = 0\n{MINIMAL}");
    let err = GlobalConfig::from_toml_str(&toml).expect_err("zero timeout rejected");
    assert!(err.to_string().contains("request_timeout_seconds"));
}

#[test]
fn load_from_missing_path_is_a_config_error() {
    let result = GlobalConfig::load_from_path("/nonexistent/star-relay.toml");
    let err = result.expect_err("missing file rejected");
    assert!(err.to_string().starts_with("config:"));
}
