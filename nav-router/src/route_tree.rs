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

//! Route matching collaborator contract and a minimal static implementation.
//!
//! The router only consumes the [`RouteTree`] trait: building a state from a
//! route name, matching a path, and splitting a transition into the segments
//! to leave and to enter. URL compilation is left to richer implementations.

use crate::state::{Params, State};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Segments touched by one transition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransitionPath {
    /// Deepest shared segment, if any.
    pub intersection: Option<String>,
    /// Segments being left, leaf to root.
    pub to_deactivate: Vec<String>,
    /// Segments being entered, root to leaf.
    pub to_activate: Vec<String>,
}

/// Route lookup used by the router.
pub trait RouteTree: Send + Sync {
    /// Builds a state for a named route, or `None` when no route has that name.
    fn build_state(&self, name: &str, params: &Params) -> Option<State>;

    /// Matches an absolute path against the tree.
    fn match_path(&self, path: &str) -> Option<State>;

    /// Splits the move from `from` to `to` into segments to leave and enter.
    fn transition_path(&self, to: &State, from: Option<&State>, reload: bool) -> TransitionPath {
        compute_transition_path(to, from, reload)
    }
}

/// Expands `users.profile` into `["users", "users.profile"]`.
pub fn name_segments(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut end = 0;
    for part in name.split('.') {
        end += part.len();
        segments.push(name[..end].to_string());
        end += 1;
    }
    segments
}

/// Default segment split: shared prefix by segment name, with params compared
/// on the deepest shared segment. `reload` forces a full re-entry.
pub fn compute_transition_path(to: &State, from: Option<&State>, reload: bool) -> TransitionPath {
    let to_segments = name_segments(to.name());
    let Some(from) = from else {
        return TransitionPath {
            intersection: None,
            to_deactivate: Vec::new(),
            to_activate: to_segments,
        };
    };
    let from_segments = name_segments(from.name());

    let mut shared = if reload {
        0
    } else {
        to_segments
            .iter()
            .zip(from_segments.iter())
            .take_while(|(to_segment, from_segment)| to_segment == from_segment)
            .count()
    };

    let deepest_common = to_segments.len().min(from_segments.len());
    if shared > 0 && shared == deepest_common && to.params() != from.params() {
        shared -= 1;
    }

    TransitionPath {
        intersection: shared.checked_sub(1).map(|index| to_segments[index].clone()),
        to_deactivate: from_segments[shared..].iter().rev().cloned().collect(),
        to_activate: to_segments[shared..].to_vec(),
    }
}

/// One named route of a [`StaticRouteTree`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Route registration failures.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RouteTreeError {
    InvalidName(String),
    InvalidPath { name: String, path: String },
    Duplicate(String),
    MissingParent { name: String, parent: String },
}

impl Display for RouteTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTreeError::InvalidName(name) => write!(f, "invalid route name: {name:?}"),
            RouteTreeError::InvalidPath { name, path } => {
                write!(f, "invalid path {path:?} for route {name}")
            }
            RouteTreeError::Duplicate(name) => write!(f, "route already defined: {name}"),
            RouteTreeError::MissingParent { name, parent } => {
                write!(f, "route {name} requires parent {parent}")
            }
        }
    }
}

impl Error for RouteTreeError {}

/// Returns `true` when every dotted segment matches `[A-Za-z_][A-Za-z0-9_-]*`.
pub fn is_valid_route_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        })
}

/// Exact-path route table keyed by dotted route name.
#[derive(Clone, Debug, Default)]
pub struct StaticRouteTree {
    by_name: HashMap<String, String>,
    by_path: HashMap<String, String>,
}

impl StaticRouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from definitions, parents first.
    pub fn from_routes(
        routes: impl IntoIterator<Item = RouteDefinition>,
    ) -> Result<Self, RouteTreeError> {
        let mut tree = Self::new();
        for route in routes {
            tree.add(route)?;
        }
        Ok(tree)
    }

    pub fn add(&mut self, route: RouteDefinition) -> Result<(), RouteTreeError> {
        if !is_valid_route_name(&route.name) {
            return Err(RouteTreeError::InvalidName(route.name));
        }
        if !route.path.starts_with('/') {
            return Err(RouteTreeError::InvalidPath {
                name: route.name,
                path: route.path,
            });
        }
        if self.by_name.contains_key(&route.name) || self.by_path.contains_key(&route.path) {
            return Err(RouteTreeError::Duplicate(route.name));
        }
        if let Some((parent, _)) = route.name.rsplit_once('.') {
            if !self.by_name.contains_key(parent) {
                return Err(RouteTreeError::MissingParent {
                    parent: parent.to_string(),
                    name: route.name,
                });
            }
        }

        self.by_path.insert(route.path.clone(), route.name.clone());
        self.by_name.insert(route.name, route.path);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl RouteTree for StaticRouteTree {
    fn build_state(&self, name: &str, params: &Params) -> Option<State> {
        let path = self.by_name.get(name)?;
        Some(State::new(name, path.clone()).with_params(params.clone()))
    }

    fn match_path(&self, path: &str) -> Option<State> {
        let name = self.by_path.get(path)?;
        Some(State::new(name.clone(), path))
    }
}
