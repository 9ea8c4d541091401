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

//! Listener registry, emission and limit enforcement.

use super::subscription::Subscription;
use crate::config::EventLimits;
use crate::error::PanicError;
use crate::observability::events;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, warn};

const COMPONENT: &str = "event_bus";

/// Outcome of one listener invocation.
pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// A registered callback. Identity is the `Arc` allocation.
pub type Listener<A> = Arc<dyn Fn(&A) -> ListenerResult + Send + Sync>;

/// Receives every listener failure raised during emission.
pub type ErrorSink<E> = Arc<dyn Fn(E, &(dyn Error + Send + Sync)) + Send + Sync>;

/// Bounds required of event identifiers.
pub trait EventKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> EventKey for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

/// Registration and emission failures.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EventError {
    DuplicateListener { event: String },
    ListenerLimit { event: String, limit: usize },
    RecursionDepth { event: String, limit: usize },
}

impl Display for EventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::DuplicateListener { event } => {
                write!(f, "duplicate listener for event {event}")
            }
            EventError::ListenerLimit { event, limit } => {
                write!(f, "listener limit ({limit}) reached for event {event}")
            }
            EventError::RecursionDepth { event, limit } => {
                write!(
                    f,
                    "maximum recursion depth ({limit}) exceeded for event {event}"
                )
            }
        }
    }
}

impl Error for EventError {}

pub(super) struct Registry<E, A> {
    listeners: HashMap<E, Vec<Listener<A>>>,
    depth: HashMap<E, usize>,
    limits: EventLimits,
}

impl<E: EventKey, A> Registry<E, A> {
    /// Removes `listener` from `event`. Returns `true` when it was registered.
    pub(super) fn remove(&mut self, event: E, listener: &Listener<A>) -> bool {
        let Some(listeners) = self.listeners.get_mut(&event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|registered| !same_listener(registered, listener));
        before != listeners.len()
    }
}

fn same_listener<A>(left: &Listener<A>, right: &Listener<A>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(left) as *const (),
        Arc::as_ptr(right) as *const (),
    )
}

pub(super) fn lock_registry<E, A>(
    registry: &Mutex<Registry<E, A>>,
) -> MutexGuard<'_, Registry<E, A>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrements the per-event depth counter when an emission pass ends.
struct DepthGuard<'a, E: EventKey, A> {
    registry: &'a Mutex<Registry<E, A>>,
    event: E,
}

impl<E: EventKey, A> Drop for DepthGuard<'_, E, A> {
    fn drop(&mut self) {
        let mut registry = lock_registry(self.registry);
        let exhausted = match registry.depth.get_mut(&self.event) {
            Some(depth) => {
                *depth = depth.saturating_sub(1);
                *depth == 0
            }
            None => false,
        };
        if exhausted {
            registry.depth.remove(&self.event);
        }
    }
}

/// Typed publish-subscribe registry owned by one router.
pub struct EventBus<E, A> {
    registry: Arc<Mutex<Registry<E, A>>>,
    error_sink: ErrorSink<E>,
}

impl<E: EventKey, A: 'static> EventBus<E, A> {
    /// Creates an empty bus whose listener failures are logged.
    pub fn new(limits: EventLimits) -> Self {
        let error_sink: ErrorSink<E> = Arc::new(|event: E, err: &(dyn Error + Send + Sync)| {
            error!(
                event = events::LISTENER_FAILED,
                component = COMPONENT,
                listener_event = ?event,
                err = %err,
                "listener failed"
            );
        });
        Self::with_error_sink(limits, error_sink)
    }

    /// Creates an empty bus reporting listener failures to `error_sink`.
    pub fn with_error_sink(limits: EventLimits, error_sink: ErrorSink<E>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                listeners: HashMap::new(),
                depth: HashMap::new(),
                limits,
            })),
            error_sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<E, A>> {
        lock_registry(&self.registry)
    }

    /// Registers `listener` for `event`.
    pub fn on(&self, event: E, listener: Listener<A>) -> Result<Subscription<E, A>, EventError> {
        let mut registry = self.lock();
        let limits = registry.limits;
        let listeners = registry.listeners.entry(event).or_default();

        if listeners
            .iter()
            .any(|registered| same_listener(registered, &listener))
        {
            return Err(EventError::DuplicateListener {
                event: format!("{event:?}"),
            });
        }

        if limits.max_listeners != 0 && listeners.len() >= limits.max_listeners {
            warn!(
                event = events::LISTENER_REJECTED,
                component = COMPONENT,
                listener_event = ?event,
                limit = limits.max_listeners,
                "listener limit reached"
            );
            return Err(EventError::ListenerLimit {
                event: format!("{event:?}"),
                limit: limits.max_listeners,
            });
        }

        listeners.push(listener.clone());

        if limits.warn_listeners != 0 && listeners.len() == limits.warn_listeners {
            warn!(
                event = events::LISTENER_WARN_THRESHOLD,
                component = COMPONENT,
                listener_event = ?event,
                count = listeners.len(),
                "listener count reached warning threshold; possible leak"
            );
        }

        Ok(Subscription::new(
            Arc::downgrade(&self.registry),
            event,
            listener,
        ))
    }

    /// Removes `listener` from `event`. Absence is not an error.
    pub fn off(&self, event: E, listener: &Listener<A>) -> bool {
        self.lock().remove(event, listener)
    }

    /// Notifies every listener registered for `event` when the pass starts.
    pub fn emit(&self, event: E, args: &A) -> Result<(), EventError> {
        let snapshot = {
            let mut registry = self.lock();
            let listeners = match registry.listeners.get(&event) {
                Some(listeners) if !listeners.is_empty() => listeners.clone(),
                _ => return Ok(()),
            };

            let max_depth = registry.limits.max_event_depth;
            let depth = registry.depth.entry(event).or_insert(0);
            if max_depth != 0 && *depth >= max_depth {
                warn!(
                    event = events::EMIT_DEPTH_EXCEEDED,
                    component = COMPONENT,
                    listener_event = ?event,
                    limit = max_depth,
                    "maximum recursion depth exceeded"
                );
                return Err(EventError::RecursionDepth {
                    event: format!("{event:?}"),
                    limit: max_depth,
                });
            }
            *depth += 1;
            listeners
        };

        let _depth = DepthGuard {
            registry: &self.registry,
            event,
        };

        for listener in &snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(args))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => self.report(event, err.as_ref()),
                Err(payload) => self.report(event, &PanicError::from_payload(payload)),
            }
        }

        Ok(())
    }

    fn report(&self, event: E, err: &(dyn Error + Send + Sync)) {
        let sink = self.error_sink.clone();
        if catch_unwind(AssertUnwindSafe(|| sink(event, err))).is_err() {
            error!(
                event = events::LISTENER_FAILED,
                component = COMPONENT,
                listener_event = ?event,
                err = %err,
                "error sink panicked while reporting listener failure"
            );
        }
    }

    /// Drops every listener and depth counter.
    pub fn clear_all(&self) {
        let mut registry = self.lock();
        registry.listeners.clear();
        registry.depth.clear();
    }

    pub fn listener_count(&self, event: E) -> usize {
        self.lock().listeners.get(&event).map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, event: E) -> bool {
        self.listener_count(event) > 0
    }

    /// Replaces limits. Applies from the next registration or emission.
    pub fn set_limits(&self, limits: EventLimits) {
        self.lock().limits = limits;
    }

    pub fn limits(&self) -> EventLimits {
        self.lock().limits
    }

    /// Current re-entrancy depth of `event`, `None` when no pass is running.
    pub fn depth(&self, event: E) -> Option<usize> {
        self.lock().depth.get(&event).copied()
    }
}
