/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Router configuration, loadable from JSON5.

use crate::state::Params;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_MAX_LISTENERS: usize = 10_000;
pub const DEFAULT_WARN_LISTENERS: usize = 1_000;
pub const DEFAULT_MAX_EVENT_DEPTH: usize = 5;

pub const DEFAULT_MAX_HOOKS: usize = 200;
pub const DEFAULT_WARN_HOOKS: usize = 50;
pub const DEFAULT_ERROR_HOOKS: usize = 100;

/// Event-core limits. `0` disables the respective check.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct EventLimits {
    pub max_listeners: usize,
    pub warn_listeners: usize,
    pub max_event_depth: usize,
}

impl EventLimits {
    /// Limits with every check disabled.
    pub const fn unbounded() -> Self {
        Self {
            max_listeners: 0,
            warn_listeners: 0,
            max_event_depth: 0,
        }
    }
}

impl Default for EventLimits {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            warn_listeners: DEFAULT_WARN_LISTENERS,
            max_event_depth: DEFAULT_MAX_EVENT_DEPTH,
        }
    }
}

/// Lifecycle hook registry ceiling and logging thresholds.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct HookLimits {
    pub max_hooks: usize,
    pub warn_hooks: usize,
    pub error_hooks: usize,
}

impl Default for HookLimits {
    fn default() -> Self {
        Self {
            max_hooks: DEFAULT_MAX_HOOKS,
            warn_hooks: DEFAULT_WARN_HOOKS,
            error_hooks: DEFAULT_ERROR_HOOKS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RouterOptions {
    /// Route used by `start()` without a target, or when the start path does not match.
    pub default_route: Option<String>,
    pub default_params: Params,
    pub limits: EventLimits,
    pub hook_limits: HookLimits,
}

impl RouterOptions {
    pub fn with_default_route(mut self, name: impl Into<String>) -> Self {
        self.default_route = Some(name.into());
        self
    }

    pub fn with_limits(mut self, limits: EventLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_hook_limits(mut self, hook_limits: HookLimits) -> Self {
        self.hook_limits = hook_limits;
        self
    }

    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        let options: RouterOptions =
            json5::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json5_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.max_listeners != 0 && limits.warn_listeners > limits.max_listeners {
            return Err(ConfigError::Invalid(format!(
                "warn_listeners ({}) exceeds max_listeners ({})",
                limits.warn_listeners, limits.max_listeners
            )));
        }

        let hooks = &self.hook_limits;
        if hooks.max_hooks == 0 {
            return Err(ConfigError::Invalid("max_hooks must be nonzero".to_string()));
        }
        if hooks.warn_hooks > hooks.error_hooks || hooks.error_hooks > hooks.max_hooks {
            return Err(ConfigError::Invalid(format!(
                "hook thresholds must satisfy warn ({}) <= error ({}) <= max ({})",
                hooks.warn_hooks, hooks.error_hooks, hooks.max_hooks
            )));
        }

        if let Some(default_route) = &self.default_route {
            if default_route.is_empty() {
                return Err(ConfigError::Invalid(
                    "default_route must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Failures while loading [`RouterOptions`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "unable to read router config: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse router config: {err}"),
            ConfigError::Invalid(reason) => write!(f, "invalid router config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EventLimits, RouterOptions, DEFAULT_MAX_HOOKS};

    #[test]
    fn parses_json5_with_comments_and_defaults() {
        let options = RouterOptions::from_json5_str(
            r#"{
                // start here when nothing matches
                default_route: "home",
                limits: { max_listeners: 3, warn_listeners: 2 },
            }"#,
        )
        .expect("config should parse");

        assert_eq!(options.default_route.as_deref(), Some("home"));
        assert_eq!(options.limits.max_listeners, 3);
        assert_eq!(
            options.limits.max_event_depth,
            EventLimits::default().max_event_depth
        );
        assert_eq!(options.hook_limits.max_hooks, DEFAULT_MAX_HOOKS);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = RouterOptions::from_json5_str("{ max_depth: 3 }").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_warn_threshold_above_max() {
        let err = RouterOptions::from_json5_str(
            "{ limits: { max_listeners: 2, warn_listeners: 5, max_event_depth: 0 } }",
        )
        .unwrap_err();

        assert!(err.to_string().contains("warn_listeners"));
    }

    #[test]
    fn unbounded_max_ignores_warn_threshold() {
        let options = RouterOptions::default().with_limits(EventLimits {
            max_listeners: 0,
            warn_listeners: 5,
            max_event_depth: 0,
        });

        assert!(options.validate().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RouterOptions::from_file("/definitely/not/here.json5").unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
    }
}
