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

use async_trait::async_trait;
use nav_router::{Guard, GuardOutcome, State};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

struct Gate {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

/// Guard that parks until its [`GateHandle`] is opened, then allows or blocks.
pub struct GatedGuard {
    gate: Arc<Gate>,
    allow: bool,
}

/// Test-side control of a [`GatedGuard`].
#[derive(Clone)]
pub struct GateHandle {
    gate: Arc<Gate>,
}

impl GatedGuard {
    pub fn new(allow: bool) -> (Self, GateHandle) {
        let gate = Arc::new(Gate {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        (
            Self {
                gate: gate.clone(),
                allow,
            },
            GateHandle { gate },
        )
    }
}

#[async_trait]
impl Guard for GatedGuard {
    async fn check(&self, _to: &State, _from: Option<&State>) -> GuardOutcome {
        self.gate.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.entered.notify_one();
        self.gate.release.notified().await;
        self.allow.into()
    }
}

impl GateHandle {
    /// Waits until the guard has been entered.
    pub async fn entered(&self) {
        self.gate.entered.notified().await;
    }

    /// Releases one parked guard call.
    pub fn open(&self) {
        self.gate.release.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.gate.calls.load(Ordering::SeqCst)
    }
}
