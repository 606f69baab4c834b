/// Environment variable that overrides the backend base address.
pub const BACKEND_URL_VAR: &str = "VISITDESK_BACKEND_URL";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub success_notice_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 120,
            success_notice_secs: 3,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(BACKEND_URL_VAR) {
            let trimmed = url.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                config.backend_url = trimmed.to_string();
            }
        }
        config
    }
}
