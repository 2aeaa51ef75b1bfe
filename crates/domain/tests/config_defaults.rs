use tb_domain::config::{Config, ProviderKind, UpstreamFailurePolicy};

#[test]
fn default_binds_all_interfaces_on_5000() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
}

#[test]
fn default_cors_is_permissive() {
    let config = Config::default();
    assert!(config.server.cors.is_wildcard());
}

#[test]
fn empty_file_equals_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.llm.provider, ProviderKind::Google);
    assert_eq!(config.chat.max_turns, 20);
    assert_eq!(config.chat.default_session_id, "default");
    assert_eq!(config.chat.upstream_failure, UpstreamFailurePolicy::Mask);
    assert!(config.observability.otlp_endpoint.is_none());
}

#[test]
fn full_file_parses() {
    let toml_str = r#"
[server]
host = "127.0.0.1"
port = 8080

[server.cors]
allowed_origins = ["http://localhost:5173"]

[llm]
model = "gemini-2.0-flash"
api_key_env = "TB_TEST_KEY"

[chat]
max_turns = 10
default_session_id = "lobby"
upstream_failure = "surface"
system_prompt = "Be brief."

[observability]
service_name = "tutor-staging"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(
        config.server.cors.allowed_origins,
        vec!["http://localhost:5173".to_string()]
    );
    assert_eq!(config.llm.model, "gemini-2.0-flash");
    assert_eq!(config.llm.api_key_env, "TB_TEST_KEY");
    assert_eq!(config.chat.max_turns, 10);
    assert_eq!(config.chat.default_session_id, "lobby");
    assert_eq!(config.chat.upstream_failure, UpstreamFailurePolicy::Surface);
    assert_eq!(config.chat.system_prompt.as_deref(), Some("Be brief."));
    assert_eq!(config.observability.service_name, "tutor-staging");
}

#[test]
fn config_roundtrips_through_toml() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let back: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(back.server.port, config.server.port);
    assert_eq!(back.llm.model, config.llm.model);
}
