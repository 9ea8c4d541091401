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

mod gated_guard;
pub use gated_guard::{GateHandle, GatedGuard};
mod event_recorder;
pub use event_recorder::{EventRecorder, RecordedEvent};
mod route_fixtures;
pub use route_fixtures::{fixture_router, fixture_routes, FIXTURE_ROUTES};

use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once per process. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
