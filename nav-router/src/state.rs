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

//! Immutable navigation state snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Route parameters keyed by parameter name.
pub type Params = BTreeMap<String, Value>;

/// Provenance key for params contributed by middleware. Never a valid route
/// segment name.
pub const MIDDLEWARE_PARAMS: &str = "@middleware";

/// Per-navigation options, echoed back through [`StateMeta::options`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationOptions {
    pub replace: bool,
    pub reload: bool,
    pub force: bool,
    pub custom: BTreeMap<String, Value>,
}

impl NavigationOptions {
    pub fn reload() -> Self {
        Self {
            reload: true,
            ..Default::default()
        }
    }

    pub fn force() -> Self {
        Self {
            force: true,
            ..Default::default()
        }
    }

    /// Returns a copy carrying one extra custom option.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Bookkeeping attached to every [`State`] produced by a transition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMeta {
    /// Monotonic transition counter.
    pub id: u64,
    /// Param provenance merged from guards and middleware, keyed by segment.
    pub params: BTreeMap<String, Params>,
    pub options: NavigationOptions,
    pub redirected: bool,
}

/// One navigation state snapshot.
///
/// A `State` is never mutated in place once it enters the transition pipeline;
/// every `with_*` method and [`State::merge`] return a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    name: String,
    #[serde(default)]
    params: Params,
    path: String,
    #[serde(default)]
    meta: StateMeta,
}

impl State {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
            path: path.into(),
            meta: StateMeta::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn meta(&self) -> &StateMeta {
        &self.meta
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_meta(mut self, meta: StateMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Attaches param provenance for one segment.
    pub fn with_segment_params(mut self, segment: impl Into<String>, params: Params) -> Self {
        self.meta.params.insert(segment.into(), params);
        self
    }

    /// Adds `params` to the provenance of `segment`, keeping earlier entries.
    pub(crate) fn record_segment_params(mut self, segment: &str, params: Params) -> Self {
        self.meta
            .params
            .entry(segment.to_string())
            .or_default()
            .extend(params);
        self
    }

    /// Params of `update` that are absent from, or differ in, `self`.
    pub(crate) fn changed_params(&self, update: &State) -> Params {
        update
            .params
            .iter()
            .filter(|(key, value)| self.params.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.meta.id = id;
        self
    }

    pub(crate) fn with_options(mut self, options: NavigationOptions) -> Self {
        self.meta.options = options;
        self
    }

    /// True when both states point at the same route with equal params.
    pub fn same_as(&self, other: &State) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Returns `true` when `name` and `path` are both non-empty.
    pub fn is_well_formed(&self) -> bool {
        !self.name.is_empty() && !self.path.is_empty()
    }

    /// Merges a same-route `update` over `self`, producing a new snapshot.
    ///
    /// Params and meta params from `update` win on conflicting keys. Name and
    /// path always stay those of `self`.
    pub fn merge(&self, update: &State) -> State {
        let mut merged = self.clone();
        for (key, value) in &update.params {
            merged.params.insert(key.clone(), value.clone());
        }
        for (segment, params) in &update.meta.params {
            let slot = merged.meta.params.entry(segment.clone()).or_default();
            for (key, value) in params {
                slot.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &update.meta.options.custom {
            merged
                .meta
                .options
                .custom
                .insert(key.clone(), value.clone());
        }
        merged.meta.redirected |= update.meta.redirected;
        merged
    }
}

/// Diagnostic copy of a destination a guard tried to substitute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptedRedirect {
    pub name: String,
    pub params: Params,
    pub path: String,
}

impl From<&State> for AttemptedRedirect {
    fn from(state: &State) -> Self {
        Self {
            name: state.name.clone(),
            params: state.params.clone(),
            path: state.path.clone(),
        }
    }
}
