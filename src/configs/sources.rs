use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_true")]
    pub niconico: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self { niconico: true }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NiconicoConfig {
    #[serde(default = "default_frontend_id")]
    pub frontend_id: String,
    #[serde(default = "default_frontend_version")]
    pub frontend_version: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub proxy: Option<HttpProxyConfig>,
}

fn default_frontend_id() -> String {
    "6".to_string()
}

fn default_frontend_version() -> String {
    "0".to_string()
}

fn default_language() -> String {
    "en-us".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for NiconicoConfig {
    fn default() -> Self {
        Self {
            frontend_id: default_frontend_id(),
            frontend_version: default_frontend_version(),
            language: default_language(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HttpProxyConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}
