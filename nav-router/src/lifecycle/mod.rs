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

//! Per-segment activation and deactivation guards.
//!
//! Hooks are registered per route segment, compiled once at registration and
//! run strictly one after another during a transition. Guards may allow or
//! block; they never redirect.

mod executor;
mod hook;
mod registry;

pub use hook::{
    async_guard_fn, guard_fn, AsyncFnGuard, FnGuard, Guard, GuardFactory, GuardOutcome,
    HookDefinition,
};
pub use registry::HookKind;

pub(crate) use executor::{apply_outcome, cancelled_error, run_hooks, CancelProbe};
pub(crate) use registry::{HookRegistry, HookSelection};
