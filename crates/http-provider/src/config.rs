use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_ASK_PATH: &str = "/ask";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`HttpAssistantConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpAssistantConfigBuilder {
    base_url: Option<String>,
    ask_path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpAssistantConfigBuilder {
    /// Sets a custom base URL, e.g. `https://museum.example`.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the path questions are posted to.
    #[inline]
    pub fn with_ask_path<S: Into<String>>(mut self, ask_path: S) -> Self {
        self.ask_path = Some(ask_path.into());
        self
    }

    /// Sets how long a single question may take, including connecting.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> HttpAssistantConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let ask_path = self
            .ask_path
            .unwrap_or_else(|| DEFAULT_ASK_PATH.to_owned());
        let ask_path = if ask_path.starts_with('/') {
            ask_path
        } else {
            format!("/{ask_path}")
        };
        HttpAssistantConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
            ask_path,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

/// Configuration for the HTTP assistant provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpAssistantConfig {
    pub(crate) base_url: String,
    pub(crate) ask_path: String,
    pub(crate) timeout: Duration,
}

impl HttpAssistantConfig {
    /// Returns the full URL questions are posted to.
    #[inline]
    pub fn ask_url(&self) -> String {
        format!("{}{}", self.base_url, self.ask_path)
    }

    /// Returns the per-question timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpAssistantConfig {
    #[inline]
    fn default() -> Self {
        HttpAssistantConfigBuilder::default().build()
    }
}
