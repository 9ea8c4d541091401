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

//! Router facade: lifecycle, navigation, guard and listener registration.

mod navigation;
mod phase;

pub use navigation::StartTarget;
pub use phase::{RouterPhase, RouterSignal, ALL_ROUTER_PHASES};

use crate::config::{ConfigError, EventLimits, RouterOptions};
use crate::dependencies::{Dependencies, DependencyMap};
use crate::error::{ErrorCode, RouterError};
use crate::event_bus::{
    EventArgs, EventBus, EventError, Listener, ListenerResult, RouterEvent, Subscription,
};
use crate::lifecycle::{HookDefinition, HookKind, HookRegistry};
use crate::middleware::{MiddlewareChain, MiddlewareDefinition};
use crate::observability::events;
use crate::plugin::Plugin;
use crate::route_tree::RouteTree;
use crate::state::State;
use crate::transition::{CancelToken, TransitionPlan};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

const COMPONENT: &str = "router";

/// Event handle returned by listener registration.
pub type RouterSubscription = Subscription<RouterEvent, EventArgs>;

/// The transition currently allowed to settle.
struct ActiveTransition {
    id: u64,
    token: CancelToken,
    to: State,
    from: Option<State>,
}

struct RouterCore {
    phase: RouterPhase,
    state: Option<State>,
    current: Option<ActiveTransition>,
    hooks: HookRegistry,
    middleware: MiddlewareChain,
    plugins: Vec<Arc<dyn Plugin>>,
}

struct RouterInner {
    routes: Arc<dyn RouteTree>,
    dependencies: Arc<dyn Dependencies>,
    options: RouterOptions,
    core: Mutex<RouterCore>,
    events: EventBus<RouterEvent, EventArgs>,
    transition_ids: AtomicU64,
}

/// Cheap, cloneable handle to one router instance.
///
/// Internal locks are never held across an `await` or while listeners run, so
/// handles can be used from listeners, guards and concurrent tasks.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

fn disposed_error() -> RouterError {
    RouterError::new(ErrorCode::RouterDisposed)
}

fn event_error(err: EventError) -> RouterError {
    let code = match &err {
        EventError::DuplicateListener { .. } => ErrorCode::DuplicateListener,
        EventError::ListenerLimit { .. } => ErrorCode::ListenerLimit,
        EventError::RecursionDepth { .. } => ErrorCode::MaxEventDepth,
    };
    RouterError::new(code)
        .with_message(err.to_string())
        .with_cause(err)
}

impl RouterInner {
    fn lock_core(&self) -> MutexGuard<'_, RouterCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the core unless the router has been disposed.
    fn lock_usable(&self) -> Result<MutexGuard<'_, RouterCore>, RouterError> {
        let core = self.lock_core();
        if core.phase == RouterPhase::Disposed {
            return Err(disposed_error());
        }
        Ok(core)
    }

    fn next_transition_id(&self) -> u64 {
        self.transition_ids.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn advance(&self, core: &mut RouterCore, signal: RouterSignal) {
        let Some(next) = core.phase.next(signal) else {
            return;
        };
        debug!(
            event = events::ROUTER_PHASE,
            component = COMPONENT,
            from_phase = core.phase.label(),
            phase = next.label(),
            signal = ?signal,
            "router phase changed"
        );
        core.phase = next;
    }

    fn plan(
        &self,
        core: &RouterCore,
        id: u64,
        to: State,
        from: Option<State>,
        reload: bool,
    ) -> TransitionPlan {
        let path = self.routes.transition_path(&to, from.as_ref(), reload);
        TransitionPlan {
            id,
            middleware: core.middleware.snapshot(),
            deactivate: core.hooks.select(HookKind::Deactivate, &path.to_deactivate),
            activate: core.hooks.select(HookKind::Activate, &path.to_activate),
            to,
            from,
        }
    }

    fn default_state(&self) -> Option<State> {
        let name = self.options.default_route.as_deref()?;
        self.routes.build_state(name, &self.options.default_params)
    }

    /// Notifies listeners. Must be called without the core lock held.
    fn emit(&self, event: RouterEvent, args: EventArgs) {
        if let Err(err) = self.events.emit(event, &args) {
            warn!(
                event = events::EMIT_FAILED,
                component = COMPONENT,
                router_event = event.as_str(),
                err = %err,
                "router event was not delivered"
            );
        }
    }
}

impl Router {
    /// Creates an idle router over `routes` with no dependencies.
    pub fn new(
        routes: impl RouteTree + 'static,
        options: RouterOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_dependencies(routes, options, DependencyMap::new())
    }

    /// Creates an idle router whose guard and middleware factories see `dependencies`.
    pub fn with_dependencies(
        routes: impl RouteTree + 'static,
        options: RouterOptions,
        dependencies: impl Dependencies + 'static,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let core = RouterCore {
            phase: RouterPhase::Idle,
            state: None,
            current: None,
            hooks: HookRegistry::new(options.hook_limits),
            middleware: MiddlewareChain::default(),
            plugins: Vec::new(),
        };
        Ok(Self {
            inner: Arc::new(RouterInner {
                routes: Arc::new(routes),
                dependencies: Arc::new(dependencies),
                events: EventBus::new(options.limits),
                options,
                core: Mutex::new(core),
                transition_ids: AtomicU64::new(0),
            }),
        })
    }

    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    pub fn phase(&self) -> RouterPhase {
        self.inner.lock_core().phase
    }

    /// `true` once started and until stopped or disposed.
    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// `true` from the moment `start` is accepted until stopped or disposed.
    pub fn is_started(&self) -> bool {
        !matches!(self.phase(), RouterPhase::Idle | RouterPhase::Disposed)
    }

    /// Last state reached by a completed transition.
    pub fn get_state(&self) -> Option<State> {
        self.inner.lock_core().state.clone()
    }

    pub fn add_activate_guard(
        &self,
        segment: &str,
        definition: impl Into<HookDefinition>,
    ) -> Result<(), RouterError> {
        self.add_guard(HookKind::Activate, segment, definition.into())
    }

    pub fn add_deactivate_guard(
        &self,
        segment: &str,
        definition: impl Into<HookDefinition>,
    ) -> Result<(), RouterError> {
        self.add_guard(HookKind::Deactivate, segment, definition.into())
    }

    fn add_guard(
        &self,
        kind: HookKind,
        segment: &str,
        definition: HookDefinition,
    ) -> Result<(), RouterError> {
        let mut core = self.inner.lock_usable()?;
        core.hooks
            .add(kind, segment, definition, self.inner.dependencies.as_ref())
    }

    /// Removes the activation guard of `segment`. Returns `true` when one existed.
    pub fn remove_activate_guard(&self, segment: &str) -> Result<bool, RouterError> {
        Ok(self
            .inner
            .lock_usable()?
            .hooks
            .remove(HookKind::Activate, segment))
    }

    /// Removes the deactivation guard of `segment`. Returns `true` when one existed.
    pub fn remove_deactivate_guard(&self, segment: &str) -> Result<bool, RouterError> {
        Ok(self
            .inner
            .lock_usable()?
            .hooks
            .remove(HookKind::Deactivate, segment))
    }

    pub fn has_activate_guard(&self, segment: &str) -> bool {
        self.inner
            .lock_core()
            .hooks
            .contains(HookKind::Activate, segment)
    }

    pub fn has_deactivate_guard(&self, segment: &str) -> bool {
        self.inner
            .lock_core()
            .hooks
            .contains(HookKind::Deactivate, segment)
    }

    /// Number of registered guards of `kind`.
    pub fn hook_count(&self, kind: HookKind) -> usize {
        self.inner.lock_core().hooks.len(kind)
    }

    /// Appends a middleware. Factories are invoked once, here.
    pub fn use_middleware(
        &self,
        definition: impl Into<MiddlewareDefinition>,
    ) -> Result<(), RouterError> {
        let mut core = self.inner.lock_usable()?;
        core.middleware
            .add(definition.into(), self.inner.dependencies.as_ref())
    }

    pub fn clear_middleware(&self) -> Result<(), RouterError> {
        self.inner.lock_usable()?.middleware.clear();
        Ok(())
    }

    pub fn middleware_count(&self) -> usize {
        self.inner.lock_core().middleware.len()
    }

    /// Registers a plugin torn down when the router is disposed.
    pub fn use_plugin(&self, plugin: impl Plugin + 'static) -> Result<(), RouterError> {
        let mut core = self.inner.lock_usable()?;
        info!(
            event = events::PLUGIN_REGISTERED,
            component = COMPONENT,
            plugin = plugin.name(),
            "plugin registered"
        );
        core.plugins.push(Arc::new(plugin));
        Ok(())
    }

    pub fn add_event_listener(
        &self,
        event: RouterEvent,
        listener: Listener<EventArgs>,
    ) -> Result<RouterSubscription, RouterError> {
        let _core = self.inner.lock_usable()?;
        self.inner.events.on(event, listener).map_err(event_error)
    }

    /// Removes `listener` from `event`. Returns `true` when it was registered.
    pub fn remove_event_listener(
        &self,
        event: RouterEvent,
        listener: &Listener<EventArgs>,
    ) -> Result<bool, RouterError> {
        let _core = self.inner.lock_usable()?;
        Ok(self.inner.events.off(event, listener))
    }

    /// Calls `listener` with the new and previous state after every successful transition.
    pub fn subscribe<F>(&self, listener: F) -> Result<RouterSubscription, RouterError>
    where
        F: Fn(&State, Option<&State>) + Send + Sync + 'static,
    {
        let wrapped: Listener<EventArgs> = Arc::new(move |args: &EventArgs| -> ListenerResult {
            if let Some(to) = &args.to_state {
                listener(to, args.from_state.as_ref());
            }
            Ok(())
        });
        self.add_event_listener(RouterEvent::TransitionSuccess, wrapped)
    }

    pub fn has_listeners(&self, event: RouterEvent) -> bool {
        self.inner.events.has_listeners(event)
    }

    pub fn listener_count(&self, event: RouterEvent) -> usize {
        self.inner.events.listener_count(event)
    }

    /// Replaces event limits. Already registered listeners are kept.
    pub fn set_limits(&self, limits: EventLimits) -> Result<(), RouterError> {
        let _core = self.inner.lock_usable()?;
        self.inner.events.set_limits(limits);
        Ok(())
    }

    pub fn limits(&self) -> EventLimits {
        self.inner.events.limits()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.lock_core();
        f.debug_struct("Router")
            .field("phase", &core.phase)
            .field("state", &core.state.as_ref().map(State::name))
            .finish_non_exhaustive()
    }
}
