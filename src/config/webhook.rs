//! Webhook verification and dispatch configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Maximum accepted age of a signed timestamp, in seconds
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,

    /// How far in the future a signed timestamp may be, in seconds
    #[serde(default = "default_max_clock_skew_secs")]
    pub max_clock_skew_secs: i64,

    /// Whether handlers run detached from the response or are awaited
    #[serde(default)]
    pub dispatch_mode: DispatchMode,
}

/// How verified events are handed to their handler.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Spawn the handler and respond without waiting for it.
    #[default]
    Background,
    /// Run the handler before responding; failures are still swallowed.
    Inline,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tolerance_secs <= 0 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }
        if self.max_clock_skew_secs < 0 {
            return Err(ValidationError::InvalidClockSkew);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: default_tolerance_secs(),
            max_clock_skew_secs: default_max_clock_skew_secs(),
            dispatch_mode: DispatchMode::default(),
        }
    }
}

fn default_tolerance_secs() -> i64 {
    300
}

fn default_max_clock_skew_secs() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_config_defaults() {
        let config = WebhookConfig::default();
        assert_eq!(config.tolerance_secs, 300);
        assert_eq!(config.max_clock_skew_secs, 60);
        assert_eq!(config.dispatch_mode, DispatchMode::Background);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let config = WebhookConfig {
            tolerance_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookTolerance)
        ));
    }

    #[test]
    fn test_negative_skew_rejected() {
        let config = WebhookConfig {
            max_clock_skew_secs: -1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidClockSkew)
        ));
    }

    #[test]
    fn test_dispatch_mode_deserializes_lowercase() {
        let mode: DispatchMode = serde_json::from_str("\"inline\"").unwrap();
        assert_eq!(mode, DispatchMode::Inline);
    }
}
