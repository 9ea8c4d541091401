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

//! Event/observable core.
//!
//! A typed publish-subscribe registry with per-event recursion guards and
//! listener cardinality limits. Listeners for one event run in registration
//! order over a snapshot taken when the emission starts: listeners added during
//! the pass wait for the next emission, listeners removed during the pass still
//! run once. A listener that fails or panics is reported to the bus error sink
//! and never stops the remaining listeners.

mod bus;
mod names;
mod subscription;

pub use bus::{ErrorSink, EventBus, EventError, EventKey, Listener, ListenerResult};
pub use names::{EventArgs, RouterEvent, ALL_ROUTER_EVENTS};
pub use subscription::Subscription;
