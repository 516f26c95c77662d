//! 配置功能测试

use lingo_relay::infrastructure::config::{parse_config, Config, FallbackDefaults};

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.default_platform, "custom");
    assert!(config.default_target_lang.is_none());
    assert!(config.stream);
    assert!(config.http_proxy.is_none());
    assert_eq!(config.fallback, FallbackDefaults::default());
}

#[test]
fn test_http_defaults() {
    let config = Config::default();

    assert_eq!(config.http.connect_timeout_secs, 10);
    assert_eq!(config.http.read_timeout_secs, 180);
    assert_eq!(config.http.request_timeout_secs, 60);
    assert!(config.http.user_agent.starts_with("lingo-relay/"));
}

#[test]
fn test_config_toml_format() {
    let toml_content = r#"
default_platform = "deepseek"
default_target_lang = "English"
stream = false
http_proxy = "http://127.0.0.1:7890"

[logging]
enable = true
path = "/tmp/test.log"
level = "DEBUG"

[http]
read_timeout_secs = 30

[fallback]
base_url = "https://llm.internal/v1"
model = "fallback-model"
"#;

    let config = parse_config(toml_content).unwrap();

    assert_eq!(config.default_platform, "deepseek");
    assert_eq!(config.default_target_lang.as_deref(), Some("English"));
    assert!(!config.stream);
    assert_eq!(config.http_proxy.as_deref(), Some("http://127.0.0.1:7890"));
    assert_eq!(config.logging.level, "DEBUG");
    assert_eq!(config.logging.path.as_deref(), Some("/tmp/test.log"));
    // 未写出的字段使用默认值
    assert_eq!(config.http.read_timeout_secs, 30);
    assert_eq!(config.http.connect_timeout_secs, 10);
    assert!(config.fallback.api_key.is_none());
    assert_eq!(config.fallback.base_url.as_deref(), Some("https://llm.internal/v1"));
    assert_eq!(config.fallback.model.as_deref(), Some("fallback-model"));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();

    assert_eq!(config.default_platform, "custom");
    assert!(config.stream);
    assert!(config.logging.enable);
}

#[test]
fn test_invalid_config_is_an_error() {
    let err = parse_config("stream = \"maybe\"").unwrap_err();
    assert!(err.to_string().starts_with("TOML parsing error"));
}

#[test]
fn test_sample_config_round_trips() {
    let sample = toml::to_string_pretty(&Config::default()).unwrap();
    let parsed = parse_config(&sample).unwrap();

    assert_eq!(parsed.default_platform, "custom");
    assert_eq!(parsed.http, Config::default().http);
}
