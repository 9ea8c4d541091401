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

//! Idempotent unsubscribe handles.

use super::bus::{lock_registry, EventKey, Listener, Registry};
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Weak};

/// Handle returned by a successful registration.
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it. Repeated calls are no-ops, and a
/// handle outliving its bus does nothing.
pub struct Subscription<E, A> {
    registry: Weak<Mutex<Registry<E, A>>>,
    event: E,
    listener: Listener<A>,
    active: AtomicBool,
}

impl<E: EventKey, A> Subscription<E, A> {
    pub(super) fn new(registry: Weak<Mutex<Registry<E, A>>>, event: E, listener: Listener<A>) -> Self {
        Self {
            registry,
            event,
            listener,
            active: AtomicBool::new(true),
        }
    }

    pub fn event(&self) -> E {
        self.event
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            lock_registry(&registry).remove(self.event, &self.listener);
        }
    }
}

impl<E: Debug, A> Debug for Subscription<E, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.active.load(Ordering::Acquire))
            .finish()
    }
}
