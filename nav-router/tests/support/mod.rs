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
    ErrorCode, Guard, NavigationOptions, Params, Router, RouterError, RouterOptions, State,
};
use navigation_test_utils::fixture_router;
use std::sync::Arc;

pub(crate) fn router() -> Router {
    fixture_router(RouterOptions::default())
}

pub(crate) async fn started_router() -> Router {
    let router = router();
    let state = router
        .start("/")
        .await
        .expect("fixture router should start at home");
    assert_eq!(state.name(), "home");
    router
}

pub(crate) async fn navigate(router: &Router, name: &str) -> Result<State, RouterError> {
    router
        .navigate(name, Params::new(), NavigationOptions::default())
        .await
}

pub(crate) fn assert_code(result: Result<State, RouterError>, code: ErrorCode) -> RouterError {
    match result {
        Ok(state) => panic!("expected {code}, navigation reached {}", state.name()),
        Err(error) => {
            assert_eq!(error.code(), code, "unexpected error: {error}");
            error
        }
    }
}

#[allow(dead_code)]
pub(crate) fn shared(guard: impl Guard + 'static) -> Arc<dyn Guard> {
    Arc::new(guard)
}
