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

use nav_router::{RouteDefinition, Router, RouterOptions, StaticRouteTree};

/// `(name, path)` pairs shared by the integration tests.
pub const FIXTURE_ROUTES: [(&str, &str); 7] = [
    ("home", "/"),
    ("users", "/users"),
    ("users.view", "/users/view"),
    ("users.view.edit", "/users/view/edit"),
    ("settings", "/settings"),
    ("admin", "/admin"),
    ("login", "/login"),
];

pub fn fixture_routes() -> StaticRouteTree {
    StaticRouteTree::from_routes(
        FIXTURE_ROUTES
            .iter()
            .map(|(name, path)| RouteDefinition::new(*name, *path)),
    )
    .expect("fixture routes should be valid")
}

/// Idle router over [`fixture_routes`] whose default route is `home`.
pub fn fixture_router(options: RouterOptions) -> Router {
    let options = if options.default_route.is_none() {
        options.with_default_route("home")
    } else {
        options
    };
    Router::new(fixture_routes(), options).expect("fixture router options should be valid")
}
