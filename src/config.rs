//! Environment driven limiter settings.
//!
//! With a prefix of `KUCOIN_REST` the following variables are read:
//!
//! | Variable                      | Example | Required |
//! |-------------------------------|---------|----------|
//! | `KUCOIN_REST_MAX_CONCURRENT`  | `5`     | yes      |
//! | `KUCOIN_REST_INTERVAL`        | `1s`    | yes      |
//! | `KUCOIN_REST_MAX_QUEUE_DEPTH` | `1000`  | no       |
//!
//! Intervals use [humantime] syntax, e.g. `250ms`, `1s` or `1m 30s`.

use crate::{LimiterBuilder, auto_traits::TaskResult, error::ConfigError, limiter::Limiter};

use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    pub max_concurrent: usize,
    pub interval: Duration,
    pub max_queue_depth: Option<usize>,
}

impl LimiterConfig {
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |var| std::env::var(var).ok())
    }

    /// Like [LimiterConfig::from_env], reading variables through `lookup`.
    pub fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            let var = format!("{prefix}_{name}");
            let value = lookup(&var);
            (var, value)
        };

        let (var, value) = read("MAX_CONCURRENT");
        let max_concurrent = parse_number(&var, value.ok_or(ConfigError::Missing(var.clone()))?)?;

        let (var, value) = read("INTERVAL");
        let interval = value.ok_or(ConfigError::Missing(var.clone()))?;
        let interval =
            humantime::parse_duration(interval.trim()).map_err(|error| ConfigError::Invalid {
                var,
                reason: error.to_string(),
            })?;

        let (var, value) = read("MAX_QUEUE_DEPTH");
        let max_queue_depth = value
            .map(|value| parse_number(&var, value))
            .transpose()?;

        let config = Self {
            max_concurrent,
            interval,
            max_queue_depth,
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.into_builder().validate()
    }

    pub fn into_builder(self) -> LimiterBuilder {
        LimiterBuilder {
            max_concurrent: self.max_concurrent,
            interval: self.interval,
            max_queue_depth: self.max_queue_depth,
        }
    }

    pub fn build<T: TaskResult>(self) -> Result<Limiter<T>, ConfigError> {
        self.into_builder().build()
    }
}

fn parse_number<N: FromStr<Err: ToString>>(var: &str, value: String) -> Result<N, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|error: N::Err| ConfigError::Invalid {
            var: var.to_string(),
            reason: error.to_string(),
        })
}
