use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Google Places / Geocoding credential. `None` leaves the hospital
    /// routes answering with a configuration error.
    pub google_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub places_page_delay_ms: u64,
    pub directory_base_url: String,
    pub directory_timeout_secs: u64,
    pub directory_user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn google_api_key_configured(&self) -> bool {
        self.google_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_page_delay_ms", &self.places_page_delay_ms)
            .field("directory_base_url", &self.directory_base_url)
            .field("directory_timeout_secs", &self.directory_timeout_secs)
            .field("directory_user_agent", &self.directory_user_agent)
            .finish()
    }
}
