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

//! Per-transition phases: `Idle -> Running -> {Done | Blocked | Cancelled}`.

use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransitionPhase {
    Idle,
    Running,
    Done,
    Blocked,
    Cancelled,
}

/// Inputs that move a transition between phases.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransitionSignal {
    Begin,
    Complete,
    Block,
    Cancel,
}

impl TransitionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            TransitionPhase::Idle => "idle",
            TransitionPhase::Running => "running",
            TransitionPhase::Done => "done",
            TransitionPhase::Blocked => "blocked",
            TransitionPhase::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            TransitionPhase::Done | TransitionPhase::Blocked | TransitionPhase::Cancelled
        )
    }

    /// Next phase for `signal`, or `None` when the move is not allowed.
    pub const fn next(self, signal: TransitionSignal) -> Option<TransitionPhase> {
        use TransitionPhase::*;
        use TransitionSignal::*;

        match (self, signal) {
            (Idle, Begin) => Some(Running),
            (Idle, Cancel) => Some(Cancelled),
            (Running, Complete) => Some(Done),
            (Running, Block) => Some(Blocked),
            (Running, Cancel) => Some(Cancelled),
            _ => None,
        }
    }
}

impl Display for TransitionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub const ALL_TRANSITION_PHASES: [TransitionPhase; 5] = [
    TransitionPhase::Idle,
    TransitionPhase::Running,
    TransitionPhase::Done,
    TransitionPhase::Blocked,
    TransitionPhase::Cancelled,
];
