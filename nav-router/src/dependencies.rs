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

//! Named dependencies handed to guard and middleware factories.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub type Dependency = Arc<dyn Any + Send + Sync>;

/// Read-only lookup of named dependencies.
pub trait Dependencies: Send + Sync {
    fn get(&self, name: &str) -> Option<Dependency>;
}

/// Fetches `name` and downcasts it to `T`.
pub fn get_as<T: Any + Send + Sync>(deps: &dyn Dependencies, name: &str) -> Option<Arc<T>> {
    deps.get(name)?.downcast::<T>().ok()
}

/// In-memory [`Dependencies`] container.
#[derive(Clone, Default)]
pub struct DependencyMap {
    entries: HashMap<String, Dependency>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Stores `value` under `name`, returning the previous entry.
    pub fn insert<T: Any + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Option<Dependency> {
        self.entries.insert(name.into(), Arc::new(value))
    }

    pub fn remove(&mut self, name: &str) -> Option<Dependency> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dependencies for DependencyMap {
    fn get(&self, name: &str) -> Option<Dependency> {
        self.entries.get(name).cloned()
    }
}

impl std::fmt::Debug for DependencyMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
