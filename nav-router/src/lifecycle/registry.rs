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

//! Segment-keyed activation and deactivation hook storage.

use super::hook::{Guard, HookDefinition};
use crate::config::HookLimits;
use crate::dependencies::Dependencies;
use crate::error::{ErrorCode, RouterError};
use crate::observability::events;
use crate::route_tree::is_valid_route_name;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, error, warn};

const COMPONENT: &str = "hook_registry";

/// Which side of a transition a hook guards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HookKind {
    Activate,
    Deactivate,
}

impl HookKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            HookKind::Activate => "activate",
            HookKind::Deactivate => "deactivate",
        }
    }

    /// Code attached to every failure raised by hooks of this kind.
    pub const fn error_code(self) -> ErrorCode {
        match self {
            HookKind::Activate => ErrorCode::CannotActivate,
            HookKind::Deactivate => ErrorCode::CannotDeactivate,
        }
    }
}

impl Display for HookKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered `(segment, guard)` pairs selected for one hook pass.
pub(crate) type HookSelection = Vec<(String, Arc<dyn Guard>)>;

#[derive(Default)]
pub(crate) struct HookRegistry {
    activate: HashMap<String, Arc<dyn Guard>>,
    deactivate: HashMap<String, Arc<dyn Guard>>,
    limits: HookLimits,
}

impl HookRegistry {
    pub(crate) fn new(limits: HookLimits) -> Self {
        Self {
            activate: HashMap::new(),
            deactivate: HashMap::new(),
            limits,
        }
    }

    fn hooks(&self, kind: HookKind) -> &HashMap<String, Arc<dyn Guard>> {
        match kind {
            HookKind::Activate => &self.activate,
            HookKind::Deactivate => &self.deactivate,
        }
    }

    fn hooks_mut(&mut self, kind: HookKind) -> &mut HashMap<String, Arc<dyn Guard>> {
        match kind {
            HookKind::Activate => &mut self.activate,
            HookKind::Deactivate => &mut self.deactivate,
        }
    }

    /// Compiles and stores a hook. The registry is untouched on failure.
    pub(crate) fn add(
        &mut self,
        kind: HookKind,
        segment: &str,
        definition: HookDefinition,
        dependencies: &dyn Dependencies,
    ) -> Result<(), RouterError> {
        if !is_valid_route_name(segment) {
            return Err(RouterError::new(ErrorCode::InvalidHandler)
                .with_message(format!("invalid segment name: {segment:?}")));
        }

        let limits = self.limits;
        let replacing = self.hooks(kind).contains_key(segment);
        if !replacing && limits.max_hooks != 0 && self.hooks(kind).len() >= limits.max_hooks {
            error!(
                event = events::HOOK_REGISTER_FAILED,
                component = COMPONENT,
                kind = kind.as_str(),
                segment,
                limit = limits.max_hooks,
                "hook limit reached"
            );
            return Err(RouterError::new(ErrorCode::HookLimit)
                .with_message(format!(
                    "{kind} hook limit ({}) reached",
                    limits.max_hooks
                ))
                .with_segment(segment));
        }

        let guard = definition.compile(segment, dependencies).map_err(|err| {
            warn!(
                event = events::HOOK_REGISTER_FAILED,
                component = COMPONENT,
                kind = kind.as_str(),
                segment,
                err = %err,
                "hook compilation failed"
            );
            err
        })?;

        let hooks = self.hooks_mut(kind);
        hooks.insert(segment.to_string(), guard);
        let count = hooks.len();

        if replacing {
            debug!(
                event = events::HOOK_REGISTER_REPLACED,
                component = COMPONENT,
                kind = kind.as_str(),
                segment,
                "hook replaced"
            );
            return Ok(());
        }

        if limits.error_hooks != 0 && count == limits.error_hooks {
            error!(
                event = events::HOOK_ERROR_THRESHOLD,
                component = COMPONENT,
                kind = kind.as_str(),
                count,
                "hook count reached error threshold"
            );
        } else if limits.warn_hooks != 0 && count == limits.warn_hooks {
            warn!(
                event = events::HOOK_WARN_THRESHOLD,
                component = COMPONENT,
                kind = kind.as_str(),
                count,
                "hook count reached warning threshold"
            );
        }

        debug!(
            event = events::HOOK_REGISTER_OK,
            component = COMPONENT,
            kind = kind.as_str(),
            segment,
            count,
            "hook registered"
        );
        Ok(())
    }

    pub(crate) fn remove(&mut self, kind: HookKind, segment: &str) -> bool {
        self.hooks_mut(kind).remove(segment).is_some()
    }

    pub(crate) fn contains(&self, kind: HookKind, segment: &str) -> bool {
        self.hooks(kind).contains_key(segment)
    }

    pub(crate) fn len(&self, kind: HookKind) -> usize {
        self.hooks(kind).len()
    }

    /// Picks the hooks for `segments`, keeping their order.
    pub(crate) fn select(&self, kind: HookKind, segments: &[String]) -> HookSelection {
        let hooks = self.hooks(kind);
        segments
            .iter()
            .filter_map(|segment| {
                hooks
                    .get(segment)
                    .map(|guard| (segment.clone(), guard.clone()))
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.activate.clear();
        self.deactivate.clear();
    }
}
