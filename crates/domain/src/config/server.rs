use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_5000")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: d_5000(),
            host: d_host(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed for CORS. `["*"]` (the default) allows any origin,
    /// which the browser frontend relies on during development.
    #[serde(default = "d_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_cors_origins(),
        }
    }
}

impl CorsConfig {
    pub fn is_wildcard(&self) -> bool {
        self.allowed_origins.len() == 1 && self.allowed_origins[0] == "*"
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_5000() -> u16 {
    5000
}
fn d_host() -> String {
    "0.0.0.0".into()
}
fn d_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_parses_port_and_host() {
        let toml_str = r#"
            port = 8080
            host = "127.0.0.1"
        "#;
        let cfg: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "127.0.0.1");
        assert!(cfg.cors.is_wildcard());
    }

    #[test]
    fn server_config_empty_toml_uses_all_defaults() {
        let cfg: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn explicit_origin_list_is_not_wildcard() {
        let toml_str = r#"
            [cors]
            allowed_origins = ["http://localhost:5173"]
        "#;
        let cfg: ServerConfig = toml::from_str(toml_str).unwrap();
        assert!(!cfg.cors.is_wildcard());
    }
}
