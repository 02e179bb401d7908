use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_VERIFICATION_CHANNEL: &str = "state-ya-business";
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 1000;
/// Discord rejects message content longer than this.
pub const DEFAULT_REPORT_CHUNK_LENGTH: usize = 2000;
/// Interaction tokens expire after 15 minutes; leave room for the follow-ups.
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 14 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("`{key}` must be a positive integer, got '{value}'")]
    NotPositive { key: &'static str, value: String },
}

/// Runtime settings read from the process environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub token: String,
    pub default_channel: String,
    pub page_size: usize,
    pub chunk_length: usize,
    pub scan_timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::Missing("DISCORD_TOKEN"))?;

        let default_channel = lookup("VERIFICATION_CHANNEL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_VERIFICATION_CHANNEL.to_owned());

        let page_size = positive(&lookup, "HISTORY_PAGE_SIZE", DEFAULT_HISTORY_PAGE_SIZE)?;
        let chunk_length = positive(&lookup, "REPORT_CHUNK_LENGTH", DEFAULT_REPORT_CHUNK_LENGTH)?;
        let scan_timeout_secs = positive(&lookup, "SCAN_TIMEOUT_SECS", DEFAULT_SCAN_TIMEOUT_SECS)?;

        Ok(Self {
            token,
            default_channel,
            page_size,
            chunk_length,
            scan_timeout: Duration::from_secs(scan_timeout_secs),
        })
    }
}

fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, SettingsError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(SettingsError::NotPositive { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let settings = settings_from(&[("DISCORD_TOKEN", "abc")]).unwrap();

        assert_eq!(settings.token, "abc");
        assert_eq!(settings.default_channel, DEFAULT_VERIFICATION_CHANNEL);
        assert_eq!(settings.page_size, DEFAULT_HISTORY_PAGE_SIZE);
        assert_eq!(settings.chunk_length, DEFAULT_REPORT_CHUNK_LENGTH);
        assert_eq!(
            settings.scan_timeout,
            Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS)
        );
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = settings_from(&[("HISTORY_PAGE_SIZE", "50")]).unwrap_err();
        assert_eq!(err, SettingsError::Missing("DISCORD_TOKEN"));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("VERIFICATION_CHANNEL", " verify-here "),
            ("HISTORY_PAGE_SIZE", "250"),
            ("REPORT_CHUNK_LENGTH", "1500"),
            ("SCAN_TIMEOUT_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(settings.default_channel, "verify-here");
        assert_eq!(settings.page_size, 250);
        assert_eq!(settings.chunk_length, 1500);
        assert_eq!(settings.scan_timeout, Duration::from_secs(60));
    }

    #[test]
    fn zero_and_garbage_numbers_are_rejected() {
        let err = settings_from(&[("DISCORD_TOKEN", "abc"), ("HISTORY_PAGE_SIZE", "0")])
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::NotPositive {
                key: "HISTORY_PAGE_SIZE",
                ..
            }
        ));

        let err = settings_from(&[("DISCORD_TOKEN", "abc"), ("REPORT_CHUNK_LENGTH", "lots")])
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::NotPositive {
                key: "REPORT_CHUNK_LENGTH",
                ..
            }
        ));
    }
}
