/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub address: String,
}

impl ApiConfig {
    pub const DEFAULT_ADDRESS: &'static str = "0.0.0.0:8000";

    /// Reads `API_ADDRESS`, falling back to [`Self::DEFAULT_ADDRESS`].
    pub fn from_env() -> Self {
        let address = std::env::var("API_ADDRESS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_ADDRESS.to_string());
        Self { address }
    }
}
