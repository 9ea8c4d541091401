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

//! One navigation attempt: middleware, then deactivation, then activation.

use super::cancel::CancelToken;
use super::phase::{TransitionPhase, TransitionSignal};
use crate::error::{ErrorCode, RouterError};
use crate::lifecycle::{cancelled_error, run_hooks, CancelProbe, HookKind, HookSelection};
use crate::middleware::{run_middleware, Middleware};
use crate::observability::{events, fields};
use crate::state::State;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "transition";

/// Everything a transition needs, captured when it is created.
pub(crate) struct TransitionPlan {
    pub(crate) id: u64,
    pub(crate) to: State,
    pub(crate) from: Option<State>,
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
    pub(crate) deactivate: HookSelection,
    pub(crate) activate: HookSelection,
}

/// Terminal phase and result of one transition.
pub(crate) struct TransitionReport {
    pub(crate) phase: TransitionPhase,
    pub(crate) result: Result<State, RouterError>,
}

struct PhaseTracker {
    id: u64,
    phase: TransitionPhase,
}

impl PhaseTracker {
    fn advance(&mut self, signal: TransitionSignal) {
        let Some(next) = self.phase.next(signal) else {
            return;
        };
        debug!(
            event = events::TRANSITION_PHASE,
            component = COMPONENT,
            transition_id = self.id,
            from_phase = self.phase.label(),
            phase = next.label(),
            "transition phase changed"
        );
        self.phase = next;
    }
}

/// Drives `plan` to a terminal phase. Cancellation is observed between steps.
pub(crate) async fn run_transition(plan: TransitionPlan, token: CancelToken) -> TransitionReport {
    let mut tracker = PhaseTracker {
        id: plan.id,
        phase: TransitionPhase::Idle,
    };
    tracker.advance(TransitionSignal::Begin);

    let probe = move || token.is_cancelled();
    let result = run_stages(plan, &probe).await;

    let signal = match &result {
        Ok(_) => TransitionSignal::Complete,
        Err(err) if err.code() == ErrorCode::Cancelled => TransitionSignal::Cancel,
        Err(_) => TransitionSignal::Block,
    };
    tracker.advance(signal);

    TransitionReport {
        phase: tracker.phase,
        result,
    }
}

async fn run_stages(plan: TransitionPlan, is_cancelled: CancelProbe<'_>) -> Result<State, RouterError> {
    let TransitionPlan {
        id,
        to,
        from,
        middleware,
        deactivate,
        activate,
    } = plan;
    let from = from.as_ref();

    debug!(
        event = events::TRANSITION_PHASE,
        component = COMPONENT,
        transition_id = id,
        to_state = to.name(),
        from_state = fields::format_state_name(from),
        middleware = middleware.len(),
        deactivate = deactivate.len(),
        activate = activate.len(),
        "transition stages planned"
    );

    checkpoint(is_cancelled)?;
    let state = run_middleware(middleware, &to, from, is_cancelled).await?;
    checkpoint(is_cancelled)?;
    let state = run_hooks(HookKind::Deactivate, deactivate, &state, from, is_cancelled).await?;
    checkpoint(is_cancelled)?;
    let state = run_hooks(HookKind::Activate, activate, &state, from, is_cancelled).await?;
    checkpoint(is_cancelled)?;
    Ok(state)
}

fn checkpoint(is_cancelled: CancelProbe<'_>) -> Result<(), RouterError> {
    if is_cancelled() {
        return Err(cancelled_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{async_guard_fn, guard_fn, Guard};
    use crate::middleware::middleware_fn;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn plan(
        middleware: Vec<Arc<dyn Middleware>>,
        deactivate: Vec<(&str, Arc<dyn Guard>)>,
        activate: Vec<(&str, Arc<dyn Guard>)>,
    ) -> TransitionPlan {
        let own = |hooks: Vec<(&str, Arc<dyn Guard>)>| {
            hooks
                .into_iter()
                .map(|(segment, guard)| (segment.to_string(), guard))
                .collect()
        };
        TransitionPlan {
            id: 1,
            to: State::new("users", "/users"),
            from: Some(State::new("home", "/")),
            middleware,
            deactivate: own(deactivate),
            activate: own(activate),
        }
    }

    fn logging_guard(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Arc<dyn Guard> {
        let log = log.clone();
        Arc::new(guard_fn(move |_, _| {
            log.lock().unwrap().push(name);
            true
        }))
    }

    #[tokio::test]
    async fn stages_run_middleware_then_deactivate_then_activate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let middleware_log = log.clone();
        let middleware: Arc<dyn Middleware> = Arc::new(middleware_fn(move |_, _| {
            middleware_log.lock().unwrap().push("middleware");
            true
        }));

        let report = run_transition(
            plan(
                vec![middleware],
                vec![("home", logging_guard(&log, "deactivate home"))],
                vec![("users", logging_guard(&log, "activate users"))],
            ),
            CancelToken::new(),
        )
        .await;

        assert_eq!(report.phase, TransitionPhase::Done);
        assert_eq!(report.result.unwrap().name(), "users");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["middleware", "deactivate home", "activate users"]
        );
    }

    #[tokio::test]
    async fn blocked_deactivation_skips_activation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let deny: Arc<dyn Guard> = Arc::new(guard_fn(|_, _| false));

        let report = run_transition(
            plan(
                Vec::new(),
                vec![("home", deny)],
                vec![("users", logging_guard(&log, "activate users"))],
            ),
            CancelToken::new(),
        )
        .await;

        assert_eq!(report.phase, TransitionPhase::Blocked);
        assert_eq!(
            report.result.unwrap_err().code(),
            ErrorCode::CannotDeactivate
        );
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let token = CancelToken::new();
        token.cancel();

        let report = run_transition(
            plan(
                Vec::new(),
                Vec::new(),
                vec![("users", logging_guard(&log, "activate users"))],
            ),
            token,
        )
        .await;

        assert_eq!(report.phase, TransitionPhase::Cancelled);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_during_pending_guard_is_observed_on_resume() {
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(Notify::new());
        let guard_gate = gate.clone();
        let guard_entered = entered.clone();
        let pending: Arc<dyn Guard> = Arc::new(async_guard_fn(move |_, _| {
            let gate = guard_gate.clone();
            let entered = guard_entered.clone();
            async move {
                entered.notify_one();
                gate.notified().await;
                true
            }
        }));
        let token = CancelToken::new();
        let canceller = token.clone();

        let transition = tokio::spawn(run_transition(
            plan(Vec::new(), Vec::new(), vec![("users", pending)]),
            token,
        ));
        entered.notified().await;
        assert!(canceller.cancel());
        gate.notify_one();

        let report = transition.await.unwrap();
        assert_eq!(report.phase, TransitionPhase::Cancelled);
        assert_eq!(report.result.unwrap_err().code(), ErrorCode::Cancelled);
    }
}
