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

use nav_router::{
    ErrorCode, EventArgs, Listener, ListenerResult, Router, RouterError, RouterEvent,
    RouterSubscription, ALL_ROUTER_EVENTS,
};
use std::sync::{Arc, Mutex};

/// One observed router event.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub event: RouterEvent,
    pub to: Option<String>,
    pub from: Option<String>,
    pub error: Option<ErrorCode>,
}

/// Records every router event in emission order.
pub struct EventRecorder {
    records: Arc<Mutex<Vec<RecordedEvent>>>,
    subscriptions: Vec<RouterSubscription>,
}

impl EventRecorder {
    pub fn attach(router: &Router) -> Result<Self, RouterError> {
        let records = Arc::new(Mutex::new(Vec::new()));
        let mut subscriptions = Vec::new();
        for event in ALL_ROUTER_EVENTS {
            let sink = records.clone();
            let listener: Listener<EventArgs> =
                Arc::new(move |args: &EventArgs| -> ListenerResult {
                    sink.lock().unwrap().push(RecordedEvent {
                        event,
                        to: args.to_state.as_ref().map(|state| state.name().to_string()),
                        from: args
                            .from_state
                            .as_ref()
                            .map(|state| state.name().to_string()),
                        error: args.error.as_ref().map(RouterError::code),
                    });
                    Ok(())
                });
            subscriptions.push(router.add_event_listener(event, listener)?);
        }
        Ok(Self {
            records,
            subscriptions,
        })
    }

    pub fn records(&self) -> Vec<RecordedEvent> {
        self.records.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<RouterEvent> {
        self.records().into_iter().map(|record| record.event).collect()
    }

    pub fn count(&self, event: RouterEvent) -> usize {
        self.records()
            .iter()
            .filter(|record| record.event == event)
            .count()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    pub fn detach(&self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}
