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

//! Canonical structured event names used across `nav-router`.

// Event core.
pub const LISTENER_WARN_THRESHOLD: &str = "listener_warn_threshold";
pub const LISTENER_FAILED: &str = "listener_failed";
pub const LISTENER_REJECTED: &str = "listener_rejected";
pub const EMIT_DEPTH_EXCEEDED: &str = "emit_depth_exceeded";
pub const EMIT_FAILED: &str = "emit_failed";

// Lifecycle hook registry and executor.
pub const HOOK_REGISTER_OK: &str = "hook_register_ok";
pub const HOOK_REGISTER_REPLACED: &str = "hook_register_replaced";
pub const HOOK_REGISTER_FAILED: &str = "hook_register_failed";
pub const HOOK_WARN_THRESHOLD: &str = "hook_warn_threshold";
pub const HOOK_ERROR_THRESHOLD: &str = "hook_error_threshold";
pub const HOOK_BLOCKED: &str = "hook_blocked";
pub const HOOK_PANICKED: &str = "hook_panicked";
pub const HOOK_REDIRECT_REJECTED: &str = "hook_redirect_rejected";
pub const HOOK_STATE_MUTATED: &str = "hook_state_mutated";

// Middleware chain.
pub const MIDDLEWARE_REGISTER_OK: &str = "middleware_register_ok";
pub const MIDDLEWARE_REGISTER_FAILED: &str = "middleware_register_failed";
pub const MIDDLEWARE_BLOCKED: &str = "middleware_blocked";

// Transition state machine.
pub const TRANSITION_PHASE: &str = "transition_phase";
pub const TRANSITION_CANCEL_OBSERVED: &str = "transition_cancel_observed";

// Router state machine.
pub const ROUTER_PHASE: &str = "router_phase";
pub const ROUTER_START_FAILED: &str = "router_start_failed";
pub const ROUTER_NAVIGATE_REJECTED: &str = "router_navigate_rejected";
pub const ROUTER_CALLBACK_PANICKED: &str = "router_callback_panicked";
pub const PLUGIN_REGISTERED: &str = "plugin_registered";
pub const PLUGIN_TEARDOWN_FAILED: &str = "plugin_teardown_failed";
pub const ROUTER_DISPOSED: &str = "router_disposed";
