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

//! Start, navigate, cancel, stop and dispose.

use super::{disposed_error, ActiveTransition, Router, RouterCore, RouterPhase, RouterSignal, COMPONENT};
use crate::error::{ErrorCode, PanicError, RouterError};
use crate::event_bus::{EventArgs, RouterEvent};
use crate::lifecycle::cancelled_error;
use crate::observability::{events, fields};
use crate::state::{NavigationOptions, Params, State};
use crate::transition::{run_transition, CancelToken, TransitionPlan, TransitionReport};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Where `start` should land.
#[derive(Clone, Debug, Default)]
pub enum StartTarget {
    /// The configured default route.
    #[default]
    Default,
    /// A path matched by the route tree, falling back to the default route.
    Path(String),
    /// An explicit state whose route must exist.
    State(State),
}

impl From<&str> for StartTarget {
    fn from(path: &str) -> Self {
        StartTarget::Path(path.to_string())
    }
}

impl From<String> for StartTarget {
    fn from(path: String) -> Self {
        StartTarget::Path(path)
    }
}

impl From<State> for StartTarget {
    fn from(state: State) -> Self {
        StartTarget::State(state)
    }
}

impl From<Option<State>> for StartTarget {
    fn from(state: Option<State>) -> Self {
        state.map_or(StartTarget::Default, StartTarget::State)
    }
}

/// Why a request never reached the transition pipeline.
enum Refusal {
    /// Returned to the caller only.
    Immediate(RouterError),
    /// Returned to the caller and emitted as `transition-error`.
    Reported {
        error: RouterError,
        to: Option<State>,
        from: Option<State>,
    },
}

struct Prepared {
    plan: TransitionPlan,
    token: CancelToken,
    superseded: Option<ActiveTransition>,
}

fn route_not_found(message: String) -> RouterError {
    RouterError::new(ErrorCode::RouteNotFound).with_message(message)
}

impl Router {
    /// Starts the router and runs the initial transition.
    ///
    /// On success the router is ready and `router-start` is emitted before
    /// `transition-success`. On failure the router returns to idle.
    pub async fn start(&self, target: impl Into<StartTarget>) -> Result<State, RouterError> {
        let prepared = self.prepare_start(target.into());
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(refusal) => return Err(self.refuse(refusal, "start")),
        };
        self.execute(prepared, NavigationOptions::default(), true)
            .await
    }

    /// Navigates to the route `name`.
    ///
    /// Accepted while ready or while another navigation is running; the
    /// running one is cancelled first.
    pub async fn navigate(
        &self,
        name: &str,
        params: Params,
        options: NavigationOptions,
    ) -> Result<State, RouterError> {
        let prepared = self.prepare_navigate(name, &params, &options);
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(refusal) => return Err(self.refuse(refusal, "navigate")),
        };
        self.execute(prepared, options, false).await
    }

    /// [`Router::start`], also reporting the result to `callback`.
    pub async fn start_with_callback<F>(
        &self,
        target: impl Into<StartTarget>,
        callback: F,
    ) -> Result<State, RouterError>
    where
        F: FnOnce(Result<State, RouterError>) + Send,
    {
        let result = self.start(target).await;
        invoke_callback(callback, result.clone());
        result
    }

    /// [`Router::navigate`], also reporting the result to `callback`.
    pub async fn navigate_with_callback<F>(
        &self,
        name: &str,
        params: Params,
        options: NavigationOptions,
        callback: F,
    ) -> Result<State, RouterError>
    where
        F: FnOnce(Result<State, RouterError>) + Send,
    {
        let result = self.navigate(name, params, options).await;
        invoke_callback(callback, result.clone());
        result
    }

    /// Cancels the running transition. Returns `true` when one was running.
    pub fn cancel(&self) -> Result<bool, RouterError> {
        let cancelled = {
            let mut core = self.inner.lock_usable()?;
            let Some(active) = core.current.take() else {
                return Ok(false);
            };
            active.token.cancel();
            let signal = if core.phase == RouterPhase::Starting {
                RouterSignal::StartFailed
            } else {
                RouterSignal::Settle
            };
            self.inner.advance(&mut core, signal);
            active
        };
        self.emit_cancel(cancelled);
        Ok(true)
    }

    /// Cancels any running transition and returns to idle.
    ///
    /// `router-stop` is emitted only when the router had finished starting.
    pub fn stop(&self) -> Result<(), RouterError> {
        let (cancelled, was_active) = {
            let mut core = self.inner.lock_usable()?;
            if core.phase == RouterPhase::Idle {
                return Ok(());
            }
            let was_active = core.phase.is_active();
            let cancelled = take_current(&mut core);
            self.inner.advance(&mut core, RouterSignal::Stop);
            core.state = None;
            (cancelled, was_active)
        };

        if let Some(active) = cancelled {
            self.emit_cancel(active);
        }
        if was_active {
            info!(
                event = events::ROUTER_PHASE,
                component = COMPONENT,
                phase = RouterPhase::Idle.label(),
                "router stopped"
            );
            self.inner.emit(RouterEvent::RouterStop, EventArgs::lifecycle());
        }
        Ok(())
    }

    /// Tears the router down. Later calls are no-ops.
    ///
    /// Every mutating operation fails with `ROUTER_DISPOSED` afterwards;
    /// [`Router::is_active`] and [`Router::get_state`] keep answering.
    pub fn dispose(&self) {
        let (cancelled, was_active, plugins) = {
            let mut core = self.inner.lock_core();
            if core.phase == RouterPhase::Disposed {
                return;
            }
            let was_active = core.phase.is_active();
            let cancelled = take_current(&mut core);
            self.inner.advance(&mut core, RouterSignal::Dispose);
            core.state = None;
            core.hooks.clear();
            core.middleware.clear();
            (cancelled, was_active, std::mem::take(&mut core.plugins))
        };

        if let Some(active) = cancelled {
            self.emit_cancel(active);
        }
        if was_active {
            self.inner.emit(RouterEvent::RouterStop, EventArgs::lifecycle());
        }

        for plugin in plugins {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| plugin.teardown())) {
                warn!(
                    event = events::PLUGIN_TEARDOWN_FAILED,
                    component = COMPONENT,
                    plugin = plugin.name(),
                    err = %PanicError::from_payload(payload),
                    "plugin teardown panicked"
                );
            }
        }

        self.inner.events.clear_all();
        info!(
            event = events::ROUTER_DISPOSED,
            component = COMPONENT,
            "router disposed"
        );
    }

    fn prepare_start(&self, target: StartTarget) -> Result<Prepared, Refusal> {
        let mut core = self.inner.lock_core();
        match core.phase {
            RouterPhase::Idle => {}
            RouterPhase::Disposed => return Err(Refusal::Immediate(disposed_error())),
            _ => {
                return Err(Refusal::Immediate(RouterError::new(
                    ErrorCode::AlreadyStarted,
                )))
            }
        }

        let to = self.resolve_start(target).map_err(|error| Refusal::Reported {
            error,
            to: None,
            from: None,
        })?;

        self.inner.advance(&mut core, RouterSignal::Start);
        Ok(self.begin(&mut core, to, None, false, None))
    }

    fn resolve_start(&self, target: StartTarget) -> Result<State, RouterError> {
        let inner = &self.inner;
        match target {
            StartTarget::Default => inner
                .default_state()
                .ok_or_else(|| route_not_found("no start target and no default route".to_string())),
            StartTarget::Path(path) => {
                if let Some(state) = inner.routes.match_path(&path) {
                    return Ok(state);
                }
                let fallback = inner.default_state();
                if fallback.is_some() {
                    debug!(
                        event = events::ROUTER_START_FAILED,
                        component = COMPONENT,
                        path = path.as_str(),
                        "start path unmatched, using default route"
                    );
                }
                fallback.ok_or_else(|| route_not_found(format!("no route matches path {path}")))
            }
            StartTarget::State(state) => {
                let known = state.is_well_formed()
                    && inner
                        .routes
                        .build_state(state.name(), state.params())
                        .is_some();
                if known {
                    Ok(state)
                } else {
                    Err(route_not_found(format!("unknown route {}", state.name())))
                }
            }
        }
    }

    fn prepare_navigate(
        &self,
        name: &str,
        params: &Params,
        options: &NavigationOptions,
    ) -> Result<Prepared, Refusal> {
        let mut core = self.inner.lock_core();
        match core.phase {
            RouterPhase::Ready | RouterPhase::Transitioning => {}
            RouterPhase::Disposed => return Err(Refusal::Immediate(disposed_error())),
            RouterPhase::Idle | RouterPhase::Starting => {
                return Err(Refusal::Immediate(RouterError::new(ErrorCode::NotStarted)))
            }
        }

        let from = core.state.clone();
        let Some(to) = self.inner.routes.build_state(name, params) else {
            return Err(Refusal::Reported {
                error: route_not_found(format!("route {name} does not exist")),
                to: None,
                from,
            });
        };

        let unchanged = from.as_ref().is_some_and(|from| from.same_as(&to));
        if unchanged && !options.reload && !options.force {
            return Err(Refusal::Reported {
                error: RouterError::new(ErrorCode::SameStates),
                to: Some(to),
                from,
            });
        }

        let superseded = take_current(&mut core);
        self.inner.advance(&mut core, RouterSignal::Navigate);
        Ok(self.begin(&mut core, to, from, options.reload, superseded))
    }

    /// Installs a new current transition and captures its plan.
    fn begin(
        &self,
        core: &mut RouterCore,
        to: State,
        from: Option<State>,
        reload: bool,
        superseded: Option<ActiveTransition>,
    ) -> Prepared {
        let id = self.inner.next_transition_id();
        let token = CancelToken::new();
        core.current = Some(ActiveTransition {
            id,
            token: token.clone(),
            to: to.clone(),
            from: from.clone(),
        });
        Prepared {
            plan: self.inner.plan(core, id, to, from, reload),
            token,
            superseded,
        }
    }

    fn refuse(&self, refusal: Refusal, operation: &str) -> RouterError {
        match refusal {
            Refusal::Immediate(error) => {
                debug!(
                    event = events::ROUTER_NAVIGATE_REJECTED,
                    component = COMPONENT,
                    operation,
                    err = %error,
                    "request refused"
                );
                error
            }
            Refusal::Reported { error, to, from } => {
                warn!(
                    event = events::ROUTER_NAVIGATE_REJECTED,
                    component = COMPONENT,
                    operation,
                    to_state = fields::format_state_name(to.as_ref()),
                    from_state = fields::format_state_name(from.as_ref()),
                    err = %error,
                    "request refused"
                );
                self.inner.emit(
                    RouterEvent::TransitionError,
                    EventArgs::transition(to, from).with_error(error.clone()),
                );
                error
            }
        }
    }

    async fn execute(
        &self,
        prepared: Prepared,
        options: NavigationOptions,
        starting: bool,
    ) -> Result<State, RouterError> {
        let Prepared {
            plan,
            token,
            superseded,
        } = prepared;

        if let Some(active) = superseded {
            self.emit_cancel(active);
        }

        let id = plan.id;
        let to = plan.to.clone();
        let from = plan.from.clone();
        self.inner.emit(
            RouterEvent::TransitionStart,
            EventArgs::transition(Some(to.clone()), from.clone()),
        );

        let report = run_transition(plan, token).await;
        self.settle(id, to, from, report, options, starting)
    }

    fn settle(
        &self,
        id: u64,
        to: State,
        from: Option<State>,
        report: TransitionReport,
        options: NavigationOptions,
        starting: bool,
    ) -> Result<State, RouterError> {
        let result = {
            let mut core = self.inner.lock_core();
            let is_current = core.current.as_ref().is_some_and(|active| active.id == id);
            if !is_current {
                debug!(
                    event = events::TRANSITION_CANCEL_OBSERVED,
                    component = COMPONENT,
                    transition_id = id,
                    phase = report.phase.label(),
                    "superseded transition settled"
                );
                return Err(cancelled_error());
            }
            core.current = None;

            match report.result {
                Ok(state) => {
                    let state = state.with_id(id).with_options(options.clone());
                    core.state = Some(state.clone());
                    let signal = if starting {
                        RouterSignal::Started
                    } else {
                        RouterSignal::Settle
                    };
                    self.inner.advance(&mut core, signal);
                    Ok(state)
                }
                Err(error) => {
                    let signal = if starting {
                        RouterSignal::StartFailed
                    } else {
                        RouterSignal::Settle
                    };
                    self.inner.advance(&mut core, signal);
                    Err(error)
                }
            }
        };

        match &result {
            Ok(state) => {
                if starting {
                    info!(
                        event = events::ROUTER_PHASE,
                        component = COMPONENT,
                        phase = RouterPhase::Ready.label(),
                        to_state = state.name(),
                        "router started"
                    );
                    self.inner
                        .emit(RouterEvent::RouterStart, EventArgs::lifecycle());
                }
                self.inner.emit(
                    RouterEvent::TransitionSuccess,
                    EventArgs::transition(Some(state.clone()), from).with_options(options),
                );
            }
            Err(error) if error.code() == ErrorCode::Cancelled => {
                self.inner.emit(
                    RouterEvent::TransitionCancel,
                    EventArgs::transition(Some(to), from),
                );
            }
            Err(error) => {
                if starting {
                    warn!(
                        event = events::ROUTER_START_FAILED,
                        component = COMPONENT,
                        to_state = to.name(),
                        err = %error,
                        "initial transition failed"
                    );
                }
                self.inner.emit(
                    RouterEvent::TransitionError,
                    EventArgs::transition(Some(to), from).with_error(error.clone()),
                );
            }
        }
        result
    }

    fn emit_cancel(&self, active: ActiveTransition) {
        debug!(
            event = events::TRANSITION_CANCEL_OBSERVED,
            component = COMPONENT,
            transition_id = active.id,
            to_state = active.to.name(),
            "transition cancelled"
        );
        self.inner.emit(
            RouterEvent::TransitionCancel,
            EventArgs::transition(Some(active.to), active.from),
        );
    }
}

/// Takes and cancels the current transition, if any.
fn take_current(core: &mut RouterCore) -> Option<ActiveTransition> {
    let active = core.current.take()?;
    active.token.cancel();
    Some(active)
}

fn invoke_callback<F>(callback: F, result: Result<State, RouterError>)
where
    F: FnOnce(Result<State, RouterError>),
{
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(result))) {
        error!(
            event = events::ROUTER_CALLBACK_PANICKED,
            component = COMPONENT,
            err = %PanicError::from_payload(payload),
            "navigation callback panicked"
        );
    }
}
