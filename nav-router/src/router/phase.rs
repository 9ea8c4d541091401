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

//! Router lifecycle phases: `Idle -> Starting -> Ready <-> Transitioning`, plus
//! terminal `Disposed`.

use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RouterPhase {
    Idle,
    Starting,
    Ready,
    Transitioning,
    Disposed,
}

/// Inputs that move the router between phases.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RouterSignal {
    Start,
    Started,
    StartFailed,
    Navigate,
    Settle,
    Stop,
    Dispose,
}

impl RouterPhase {
    pub const fn label(self) -> &'static str {
        match self {
            RouterPhase::Idle => "idle",
            RouterPhase::Starting => "starting",
            RouterPhase::Ready => "ready",
            RouterPhase::Transitioning => "transitioning",
            RouterPhase::Disposed => "disposed",
        }
    }

    /// True once the initial transition has completed.
    pub const fn is_active(self) -> bool {
        matches!(self, RouterPhase::Ready | RouterPhase::Transitioning)
    }

    /// Next phase for `signal`, or `None` when the move is not allowed.
    ///
    /// `Navigate` from `Transitioning` is accepted: the newer navigation
    /// supersedes the running one.
    pub const fn next(self, signal: RouterSignal) -> Option<RouterPhase> {
        use RouterPhase::*;
        use RouterSignal::*;

        match (self, signal) {
            (Idle, Start) => Some(Starting),
            (Starting, Started) => Some(Ready),
            (Starting, StartFailed) => Some(Idle),
            (Ready, Navigate) | (Transitioning, Navigate) => Some(Transitioning),
            (Transitioning, Settle) => Some(Ready),
            (Starting, Stop) | (Ready, Stop) | (Transitioning, Stop) => Some(Idle),
            (Idle, Dispose)
            | (Starting, Dispose)
            | (Ready, Dispose)
            | (Transitioning, Dispose) => Some(Disposed),
            _ => None,
        }
    }
}

impl Display for RouterPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub const ALL_ROUTER_PHASES: [RouterPhase; 5] = [
    RouterPhase::Idle,
    RouterPhase::Starting,
    RouterPhase::Ready,
    RouterPhase::Transitioning,
    RouterPhase::Disposed,
];

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SIGNALS: [RouterSignal; 7] = [
        RouterSignal::Start,
        RouterSignal::Started,
        RouterSignal::StartFailed,
        RouterSignal::Navigate,
        RouterSignal::Settle,
        RouterSignal::Stop,
        RouterSignal::Dispose,
    ];

    #[test]
    fn disposed_is_terminal() {
        for signal in ALL_SIGNALS {
            assert_eq!(RouterPhase::Disposed.next(signal), None);
        }
    }

    #[test]
    fn every_live_phase_can_be_disposed() {
        for phase in ALL_ROUTER_PHASES {
            if phase != RouterPhase::Disposed {
                assert_eq!(
                    phase.next(RouterSignal::Dispose),
                    Some(RouterPhase::Disposed)
                );
            }
        }
    }

    #[test]
    fn navigation_only_from_started_phases() {
        assert_eq!(RouterPhase::Idle.next(RouterSignal::Navigate), None);
        assert_eq!(RouterPhase::Starting.next(RouterSignal::Navigate), None);
        assert_eq!(
            RouterPhase::Ready.next(RouterSignal::Navigate),
            Some(RouterPhase::Transitioning)
        );
        assert_eq!(
            RouterPhase::Transitioning.next(RouterSignal::Navigate),
            Some(RouterPhase::Transitioning)
        );
    }

    #[test]
    fn start_outcomes() {
        let starting = RouterPhase::Idle.next(RouterSignal::Start).unwrap();

        assert_eq!(starting.next(RouterSignal::Started), Some(RouterPhase::Ready));
        assert_eq!(starting.next(RouterSignal::StartFailed), Some(RouterPhase::Idle));
        assert_eq!(RouterPhase::Ready.next(RouterSignal::Start), None);
        assert_eq!(RouterPhase::Idle.next(RouterSignal::Stop), None);
    }
}
