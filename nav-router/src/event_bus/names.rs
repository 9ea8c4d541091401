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

//! Router lifecycle event names and their argument shape.

use crate::error::RouterError;
use crate::state::{NavigationOptions, State};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Events emitted by a [`Router`](crate::Router).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RouterEvent {
    RouterStart,
    RouterStop,
    TransitionStart,
    TransitionSuccess,
    TransitionError,
    TransitionCancel,
}

pub const ALL_ROUTER_EVENTS: [RouterEvent; 6] = [
    RouterEvent::RouterStart,
    RouterEvent::RouterStop,
    RouterEvent::TransitionStart,
    RouterEvent::TransitionSuccess,
    RouterEvent::TransitionError,
    RouterEvent::TransitionCancel,
];

impl RouterEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            RouterEvent::RouterStart => "router-start",
            RouterEvent::RouterStop => "router-stop",
            RouterEvent::TransitionStart => "transition-start",
            RouterEvent::TransitionSuccess => "transition-success",
            RouterEvent::TransitionError => "transition-error",
            RouterEvent::TransitionCancel => "transition-cancel",
        }
    }
}

impl Display for RouterEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouterEvent {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ALL_ROUTER_EVENTS
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| format!("unknown router event: {name}"))
    }
}

/// Arguments passed to router event listeners.
///
/// | event                | `to_state` | `from_state` | third argument |
/// |----------------------|------------|--------------|----------------|
/// | `router-start`       | -          | -            | -              |
/// | `router-stop`        | -          | -            | -              |
/// | `transition-start`   | yes        | if any       | -              |
/// | `transition-success` | yes        | if any       | `options`      |
/// | `transition-error`   | if known   | if any       | `error`        |
/// | `transition-cancel`  | yes        | if any       | -              |
#[derive(Clone, Debug, Default)]
pub struct EventArgs {
    pub to_state: Option<State>,
    pub from_state: Option<State>,
    pub error: Option<RouterError>,
    pub options: Option<NavigationOptions>,
}

impl EventArgs {
    pub(crate) fn lifecycle() -> Self {
        Self::default()
    }

    pub(crate) fn transition(to_state: Option<State>, from_state: Option<State>) -> Self {
        Self {
            to_state,
            from_state,
            ..Self::default()
        }
    }

    pub(crate) fn with_error(mut self, error: RouterError) -> Self {
        self.error = Some(error);
        self
    }

    pub(crate) fn with_options(mut self, options: NavigationOptions) -> Self {
        self.options = Some(options);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{RouterEvent, ALL_ROUTER_EVENTS};

    #[test]
    fn names_parse_back() {
        for event in ALL_ROUTER_EVENTS {
            assert_eq!(event.as_str().parse::<RouterEvent>(), Ok(event));
        }
        assert!("router-pause".parse::<RouterEvent>().is_err());
    }
}
