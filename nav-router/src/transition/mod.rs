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

//! Transition state machine.
//!
//! A fresh transition is planned for every navigation attempt. It runs the
//! middleware chain, then deactivation hooks leaf to root, then activation
//! hooks root to leaf, and settles in exactly one terminal phase. Cancellation
//! is a shared flag checked between steps; an in-flight guard always finishes.

mod cancel;
mod phase;
mod pipeline;

pub use phase::{TransitionPhase, TransitionSignal, ALL_TRANSITION_PHASES};

pub(crate) use cancel::CancelToken;
pub(crate) use pipeline::{run_transition, TransitionPlan, TransitionReport};
