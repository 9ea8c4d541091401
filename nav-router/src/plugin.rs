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

//! Plugin contract: extensions that must release resources on dispose.

/// A router extension torn down exactly once when the router is disposed.
pub trait Plugin: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        "plugin"
    }

    fn teardown(&self);
}

/// Adapts a closure into a [`Plugin`].
pub struct FnPlugin<F> {
    name: String,
    teardown: F,
}

impl<F> Plugin for FnPlugin<F>
where
    F: Fn() + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn teardown(&self) {
        (self.teardown)()
    }
}

/// Builds a plugin whose teardown runs `teardown`.
pub fn plugin_fn<F>(name: impl Into<String>, teardown: F) -> FnPlugin<F>
where
    F: Fn() + Send + Sync,
{
    FnPlugin {
        name: name.into(),
        teardown,
    }
}
