use std::time::Duration;

use serde::{Deserialize, Serialize};


pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_REFRESH_AFTER_PLAY: Duration = Duration::from_millis(100);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    // Prefix for API paths. Empty means same origin, which is what the web page uses.
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    // Delay before the extra state refresh that follows an accepted play.
    #[serde(with = "humantime_serde")]
    pub refresh_after_play: Duration,
    // A request without a response after this long is considered lost.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            refresh_after_play: DEFAULT_REFRESH_AFTER_PLAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> { serde_yaml::from_str(yaml) }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
