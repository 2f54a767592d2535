//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use tunwatch_core::prelude::*;
use tunwatch_feed::schedule::DEFAULT_RETRY_DELAYS_SECS;
use tunwatch_feed::{FeedConfig, RetrySchedule, DEFAULT_URI};

/// Lower bound for the countdown tick.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Upper bound for the countdown tick. A slower tick delays every reconnect.
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Longest accepted reconnect delay (one day).
pub const MAX_RETRY_DELAY_SECS: u64 = 86_400;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub feed: FeedSettings,
}

/// `[feed]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSettings {
    /// WebSocket URI of the tunnel server's status feed
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Reconnect delays in seconds; the last entry repeats forever.
    ///
    /// The attempt is issued once less than a whole second remains, so a
    /// delay of `1` retries almost immediately. Use at least `2` for a real
    /// pause against an unreachable server.
    #[serde(default = "default_retry_delays")]
    pub retry_delays_secs: Vec<u64>,

    /// Countdown refresh interval in milliseconds, clamped to 50..=1000
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            retry_delays_secs: default_retry_delays(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_retry_delays() -> Vec<u64> {
    DEFAULT_RETRY_DELAYS_SECS.to_vec()
}

fn default_tick_interval_ms() -> u64 {
    250
}

impl Settings {
    /// Validate the `[feed]` section and build the controller configuration.
    pub fn feed_config(&self) -> Result<FeedConfig> {
        let feed = &self.feed;

        let url = Url::parse(&feed.uri)
            .map_err(|e| Error::config_invalid(format!("invalid feed uri {:?}: {}", feed.uri, e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::config_invalid(format!(
                "feed uri must use ws:// or wss://, got {}://",
                url.scheme()
            )));
        }

        if let Some(delay) = feed
            .retry_delays_secs
            .iter()
            .find(|&&secs| secs > MAX_RETRY_DELAY_SECS)
        {
            return Err(Error::config_invalid(format!(
                "retry delay {delay}s exceeds the maximum of {MAX_RETRY_DELAY_SECS}s"
            )));
        }
        let schedule = RetrySchedule::from_secs(&feed.retry_delays_secs)?;

        let tick_ms = feed
            .tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        if tick_ms != feed.tick_interval_ms {
            warn!(
                "tick_interval_ms = {} is out of range, using {}",
                feed.tick_interval_ms, tick_ms
            );
        }
        let tick_interval = Duration::from_millis(tick_ms);

        Ok(FeedConfig {
            uri: feed.uri.clone(),
            schedule,
            tick_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feed_config() {
        let config = Settings::default().feed_config().unwrap();
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let settings: Settings = toml::from_str("[feed]\nuri = \"wss://tunnel.example/stats\"\n").unwrap();
        assert_eq!(settings.feed.uri, "wss://tunnel.example/stats");
        assert_eq!(settings.feed.retry_delays_secs, vec![5, 5, 5, 10]);
        assert_eq!(settings.feed.tick_interval_ms, 250);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_custom_schedule() {
        let mut settings = Settings::default();
        settings.feed.retry_delays_secs = vec![1, 2, 30];
        let config = settings.feed_config().unwrap();
        assert_eq!(config.schedule.delay(7), Duration::from_secs(30));
    }

    #[test]
    fn test_http_scheme_rejected() {
        let mut settings = Settings::default();
        settings.feed.uri = "http://localhost:4430/stats".to_string();
        let err = settings.feed_config().unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_unparsable_uri_rejected() {
        let mut settings = Settings::default();
        settings.feed.uri = "not a uri".to_string();
        assert!(matches!(
            settings.feed_config(),
            Err(Error::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let mut settings = Settings::default();
        settings.feed.retry_delays_secs.clear();
        assert!(matches!(
            settings.feed_config(),
            Err(Error::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_tick_interval_clamped() {
        let mut settings = Settings::default();
        settings.feed.tick_interval_ms = 1;
        let config = settings.feed_config().unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(MIN_TICK_INTERVAL_MS));
    }

    #[test]
    fn test_slow_tick_interval_clamped() {
        let mut settings = Settings::default();
        settings.feed.tick_interval_ms = 120_000;
        let config = settings.feed_config().unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(MAX_TICK_INTERVAL_MS));
    }

    #[test]
    fn test_huge_retry_delay_rejected() {
        let settings: Settings =
            toml::from_str("[feed]\nretry_delays_secs = [5, 9223372036854775807]\n").unwrap();
        let err = settings.feed_config().unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
        assert!(err.to_string().contains("9223372036854775807"));
    }

    #[test]
    fn test_one_day_retry_delay_accepted() {
        let mut settings = Settings::default();
        settings.feed.retry_delays_secs = vec![MAX_RETRY_DELAY_SECS];
        let config = settings.feed_config().unwrap();
        assert_eq!(config.schedule.delay(0), Duration::from_secs(MAX_RETRY_DELAY_SECS));
    }
}
