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

//! Sequential execution of the hooks selected for one transition stage.

use super::hook::GuardOutcome;
use super::registry::{HookKind, HookSelection};
use crate::error::{ErrorCode, PanicError, RouterError};
use crate::observability::{events, fields};
use crate::state::{AttemptedRedirect, State, MIDDLEWARE_PARAMS};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, warn};

const COMPONENT: &str = "hook_executor";

/// Cooperative cancellation probe, polled between steps.
pub(crate) type CancelProbe<'a> = &'a (dyn Fn() -> bool + Send + Sync);

pub(crate) fn cancelled_error() -> RouterError {
    RouterError::new(ErrorCode::Cancelled)
}

/// Runs `hooks` in order against `to`, returning the merged state.
///
/// Order is the caller's: root to leaf for activation, leaf to root for
/// deactivation. Cancellation wins over the outcome of the hook that just ran.
pub(crate) async fn run_hooks(
    kind: HookKind,
    hooks: HookSelection,
    to: &State,
    from: Option<&State>,
    is_cancelled: CancelProbe<'_>,
) -> Result<State, RouterError> {
    let mut running = to.clone();
    if hooks.is_empty() {
        return Ok(running);
    }

    let code = kind.error_code();
    for (segment, guard) in hooks {
        let result = AssertUnwindSafe(guard.check(&running, from))
            .catch_unwind()
            .await;

        if is_cancelled() {
            debug!(
                event = events::TRANSITION_CANCEL_OBSERVED,
                component = COMPONENT,
                kind = kind.as_str(),
                segment = segment.as_str(),
                "cancellation observed after hook"
            );
            return Err(cancelled_error());
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic = PanicError::from_payload(payload);
                error!(
                    event = events::HOOK_PANICKED,
                    component = COMPONENT,
                    kind = kind.as_str(),
                    segment = segment.as_str(),
                    err = %panic,
                    "hook panicked"
                );
                return Err(RouterError::new(code)
                    .with_message(format!("{kind} hook panicked"))
                    .with_segment(segment)
                    .with_cause(panic));
            }
        };

        running = apply_outcome(outcome, running, code, Some(&segment))?;
    }

    Ok(running)
}

/// Folds one guard or middleware outcome into the running state.
///
/// Failures are re-coded with `code`. Redirect attempts, by rejection or by
/// proceeding with another route, become failures carrying the attempted
/// destination.
pub(crate) fn apply_outcome(
    outcome: GuardOutcome,
    running: State,
    code: ErrorCode,
    segment: Option<&str>,
) -> Result<State, RouterError> {
    match outcome {
        GuardOutcome::Allow => Ok(running),
        GuardOutcome::Block => {
            debug!(
                event = events::HOOK_BLOCKED,
                component = COMPONENT,
                code = code.as_str(),
                segment = segment.unwrap_or(fields::NONE),
                to_state = running.name(),
                "transition blocked"
            );
            Err(tag_segment(RouterError::new(code), segment))
        }
        GuardOutcome::Reject(rejection) => {
            if let Some(redirect) = rejection.redirect() {
                let attempted = AttemptedRedirect::from(redirect);
                return Err(redirect_rejected(code, segment, attempted).with_cause(rejection));
            }
            let mut rejection = rejection;
            rejection.set_code(code);
            Err(tag_segment(rejection, segment))
        }
        GuardOutcome::Proceed(state) => {
            if state.name() != running.name() {
                return Err(redirect_rejected(code, segment, AttemptedRedirect::from(&state)));
            }
            if state.params() != running.params() || state.path() != running.path() {
                warn!(
                    event = events::HOOK_STATE_MUTATED,
                    component = COMPONENT,
                    segment = segment.unwrap_or(fields::NONE),
                    to_state = running.name(),
                    "guard changed params or path of the target state"
                );
            }
            let changed = running.changed_params(&state);
            let merged = running.merge(&state);
            if changed.is_empty() {
                return Ok(merged);
            }
            let origin = segment.unwrap_or(MIDDLEWARE_PARAMS);
            Ok(merged.record_segment_params(origin, changed))
        }
    }
}

fn tag_segment(error: RouterError, segment: Option<&str>) -> RouterError {
    match segment {
        Some(segment) if error.segment().is_none() => error.with_segment(segment),
        _ => error,
    }
}

fn redirect_rejected(
    code: ErrorCode,
    segment: Option<&str>,
    attempted: AttemptedRedirect,
) -> RouterError {
    warn!(
        event = events::HOOK_REDIRECT_REJECTED,
        component = COMPONENT,
        code = code.as_str(),
        segment = segment.unwrap_or(fields::NONE),
        attempted = attempted.name.as_str(),
        "guards cannot redirect"
    );
    tag_segment(
        RouterError::new(code)
            .with_message("guards cannot redirect")
            .with_attempted_redirect(attempted),
        segment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::hook::{guard_fn, Guard};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn users_view() -> State {
        State::new("users.view", "/users/view").with_param("id", 7)
    }

    fn guard(guard: impl Guard + 'static) -> Arc<dyn Guard> {
        Arc::new(guard)
    }

    fn never_cancelled() -> bool {
        false
    }

    fn selection(hooks: Vec<(&str, Arc<dyn Guard>)>) -> HookSelection {
        hooks
            .into_iter()
            .map(|(segment, guard)| (segment.to_string(), guard))
            .collect()
    }

    fn recording(log: &Arc<Mutex<Vec<String>>>, name: &str, allow: bool) -> Arc<dyn Guard> {
        let log = log.clone();
        let name = name.to_string();
        guard(guard_fn(move |_, _| {
            log.lock().unwrap().push(name.clone());
            allow
        }))
    }

    #[tokio::test]
    async fn empty_selection_returns_target_unchanged() {
        let to = users_view();

        let state = run_hooks(HookKind::Activate, Vec::new(), &to, None, &never_cancelled)
            .await
            .unwrap();

        assert!(state.same_as(&to));
    }

    #[tokio::test]
    async fn hooks_run_in_order_and_stop_on_block() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = selection(vec![
            ("users", recording(&log, "users", true)),
            ("users.view", recording(&log, "users.view", false)),
            ("users.view.edit", recording(&log, "users.view.edit", true)),
        ]);

        let error = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::CannotActivate);
        assert_eq!(error.segment(), Some("users.view"));
        assert_eq!(*log.lock().unwrap(), vec!["users", "users.view"]);
    }

    #[tokio::test]
    async fn proceeding_to_another_route_is_blocked() {
        let hooks = selection(vec![(
            "users",
            guard(guard_fn(|_, _| State::new("login", "/login"))),
        )]);

        let error = run_hooks(
            HookKind::Deactivate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::CannotDeactivate);
        assert_eq!(error.attempted_redirect().unwrap().name, "login");
        assert!(error.redirect().is_none());
    }

    #[tokio::test]
    async fn rejection_with_redirect_is_blocked() {
        let hooks = selection(vec![(
            "users",
            guard(guard_fn(|_, _| {
                RouterError::new(ErrorCode::TransitionErr).with_redirect(State::new("login", "/login"))
            })),
        )]);

        let error = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::CannotActivate);
        assert_eq!(error.attempted_redirect().unwrap().path, "/login");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[tokio::test]
    async fn plain_rejection_is_recoded() {
        let hooks = selection(vec![(
            "users.view",
            guard(guard_fn(|_, _| {
                RouterError::new(ErrorCode::TransitionErr).with_message("expired")
            })),
        )]);

        let error = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::CannotActivate);
        assert_eq!(error.message(), "expired");
        assert_eq!(error.segment(), Some("users.view"));
    }

    #[tokio::test]
    async fn same_route_states_are_merged_later_hook_wins() {
        let hooks = selection(vec![
            (
                "users",
                guard(guard_fn(|to: &State, _| {
                    to.clone().with_param("tab", "a").with_param("seen", true)
                })),
            ),
            (
                "users.view",
                guard(guard_fn(|to: &State, _| to.clone().with_param("tab", "b"))),
            ),
        ]);

        let state = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap();

        assert_eq!(state.name(), "users.view");
        assert_eq!(state.path(), "/users/view");
        assert_eq!(state.param("tab"), Some(&serde_json::json!("b")));
        assert_eq!(state.param("seen"), Some(&serde_json::json!(true)));
        assert_eq!(state.param("id"), Some(&serde_json::json!(7)));

        let provenance = &state.meta().params;
        assert_eq!(provenance["users"].len(), 2);
        assert_eq!(provenance["users"]["seen"], serde_json::json!(true));
        assert_eq!(provenance["users.view"].len(), 1);
        assert_eq!(provenance["users.view"]["tab"], serde_json::json!("b"));
    }

    #[tokio::test]
    async fn unchanged_proceed_records_no_provenance() {
        let hooks = selection(vec![(
            "users.view",
            guard(guard_fn(|to: &State, _| to.clone())),
        )]);

        let state = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap();

        assert!(state.meta().params.is_empty());
    }

    #[tokio::test]
    async fn panicking_hook_is_tagged_with_segment() {
        let hooks = selection(vec![(
            "users",
            guard(guard_fn(|_, _| -> bool { panic!("boom") })),
        )]);

        let error = run_hooks(
            HookKind::Activate,
            hooks,
            &users_view(),
            None,
            &never_cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::CannotActivate);
        assert_eq!(error.segment(), Some("users"));
        assert!(std::error::Error::source(&error)
            .unwrap()
            .to_string()
            .contains("boom"));
    }

    #[tokio::test]
    async fn cancellation_after_hook_wins_over_its_result() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let log = Arc::new(Mutex::new(Vec::new()));
        let flag = cancelled.clone();
        let hooks = selection(vec![
            (
                "users",
                guard(guard_fn(move |_, _| {
                    flag.store(true, Ordering::SeqCst);
                    true
                })),
            ),
            ("users.view", recording(&log, "users.view", true)),
        ]);
        let probe = move || cancelled.load(Ordering::SeqCst);

        let error = run_hooks(HookKind::Activate, hooks, &users_view(), None, &probe)
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Cancelled);
        assert!(log.lock().unwrap().is_empty());
    }
}
