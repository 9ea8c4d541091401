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

//! Guard contract, closure adapters and registration-time hook definitions.

use crate::dependencies::Dependencies;
use crate::error::{ErrorCode, RouterError};
use crate::state::State;
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// Result of one guard or middleware invocation.
#[derive(Clone, Debug)]
pub enum GuardOutcome {
    /// Continue with the running state unchanged.
    Allow,
    /// Continue, merging this state into the running one. A different route
    /// name is treated as a redirect attempt and blocks the transition.
    Proceed(State),
    /// Stop the transition.
    Block,
    /// Stop the transition with a specific error. It is re-coded by the caller.
    Reject(RouterError),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow | GuardOutcome::Proceed(_))
    }
}

impl From<bool> for GuardOutcome {
    fn from(allowed: bool) -> Self {
        if allowed {
            GuardOutcome::Allow
        } else {
            GuardOutcome::Block
        }
    }
}

impl From<State> for GuardOutcome {
    fn from(state: State) -> Self {
        GuardOutcome::Proceed(state)
    }
}

impl From<RouterError> for GuardOutcome {
    fn from(error: RouterError) -> Self {
        GuardOutcome::Reject(error)
    }
}

impl<T> From<Result<T, RouterError>> for GuardOutcome
where
    T: Into<GuardOutcome>,
{
    fn from(result: Result<T, RouterError>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(error) => GuardOutcome::Reject(error),
        }
    }
}

/// Per-segment activation or deactivation predicate.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, to: &State, from: Option<&State>) -> GuardOutcome;
}

/// Guard always answering the same way. Compiled from the boolean shorthand.
struct ConstantGuard(bool);

#[async_trait]
impl Guard for ConstantGuard {
    async fn check(&self, _to: &State, _from: Option<&State>) -> GuardOutcome {
        self.0.into()
    }
}

/// Synchronous closure guard built by [`guard_fn`].
pub struct FnGuard<F>(F);

#[async_trait]
impl<F, O> Guard for FnGuard<F>
where
    F: Fn(&State, Option<&State>) -> O + Send + Sync,
    O: Into<GuardOutcome>,
{
    async fn check(&self, to: &State, from: Option<&State>) -> GuardOutcome {
        (self.0)(to, from).into()
    }
}

/// Wraps a synchronous closure as a [`Guard`].
pub fn guard_fn<F, O>(check: F) -> FnGuard<F>
where
    F: Fn(&State, Option<&State>) -> O + Send + Sync,
    O: Into<GuardOutcome>,
{
    FnGuard(check)
}

/// Asynchronous closure guard built by [`async_guard_fn`].
pub struct AsyncFnGuard<F>(F);

#[async_trait]
impl<F, Fut, O> Guard for AsyncFnGuard<F>
where
    F: Fn(State, Option<State>) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send,
    O: Into<GuardOutcome>,
{
    async fn check(&self, to: &State, from: Option<&State>) -> GuardOutcome {
        (self.0)(to.clone(), from.cloned()).await.into()
    }
}

/// Wraps a closure returning a future as a [`Guard`]. States are passed by value.
pub fn async_guard_fn<F, Fut, O>(check: F) -> AsyncFnGuard<F>
where
    F: Fn(State, Option<State>) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send,
    O: Into<GuardOutcome>,
{
    AsyncFnGuard(check)
}

/// Builds a guard from the router's dependencies, or `None` on failure.
pub type GuardFactory = Box<dyn FnOnce(&dyn Dependencies) -> Option<Arc<dyn Guard>> + Send>;

/// What a caller may register for a segment.
pub enum HookDefinition {
    Allow,
    Deny,
    Guard(Arc<dyn Guard>),
    Factory(GuardFactory),
}

impl HookDefinition {
    pub fn guard(guard: impl Guard + 'static) -> Self {
        HookDefinition::Guard(Arc::new(guard))
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: FnOnce(&dyn Dependencies) -> Option<Arc<dyn Guard>> + Send + 'static,
    {
        HookDefinition::Factory(Box::new(factory))
    }

    /// Resolves the definition into a callable guard.
    pub(crate) fn compile(
        self,
        segment: &str,
        dependencies: &dyn Dependencies,
    ) -> Result<Arc<dyn Guard>, RouterError> {
        match self {
            HookDefinition::Allow => Ok(Arc::new(ConstantGuard(true))),
            HookDefinition::Deny => Ok(Arc::new(ConstantGuard(false))),
            HookDefinition::Guard(guard) => Ok(guard),
            HookDefinition::Factory(factory) => factory(dependencies).ok_or_else(|| {
                RouterError::new(ErrorCode::InvalidHandler)
                    .with_message("guard factory did not produce a guard")
                    .with_segment(segment)
            }),
        }
    }
}

impl From<bool> for HookDefinition {
    fn from(allowed: bool) -> Self {
        if allowed {
            HookDefinition::Allow
        } else {
            HookDefinition::Deny
        }
    }
}

impl From<Arc<dyn Guard>> for HookDefinition {
    fn from(guard: Arc<dyn Guard>) -> Self {
        HookDefinition::Guard(guard)
    }
}

impl<G: Guard + 'static> From<G> for HookDefinition {
    fn from(guard: G) -> Self {
        HookDefinition::guard(guard)
    }
}

impl Debug for HookDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HookDefinition::Allow => f.write_str("Allow"),
            HookDefinition::Deny => f.write_str("Deny"),
            HookDefinition::Guard(_) => f.write_str("Guard(..)"),
            HookDefinition::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependencies::{get_as, DependencyMap};

    fn home() -> State {
        State::new("home", "/")
    }

    #[tokio::test]
    async fn boolean_shorthand_compiles_to_constant_guards() {
        let deps = DependencyMap::new();
        let allow = HookDefinition::from(true).compile("home", &deps).unwrap();
        let deny = HookDefinition::from(false).compile("home", &deps).unwrap();

        assert!(matches!(allow.check(&home(), None).await, GuardOutcome::Allow));
        assert!(matches!(deny.check(&home(), None).await, GuardOutcome::Block));
    }

    #[tokio::test]
    async fn factory_receives_dependencies() {
        let deps = DependencyMap::new().with("logged_in", false);
        let definition = HookDefinition::factory(|deps| {
            let logged_in = get_as::<bool>(deps, "logged_in")?;
            let guard: Arc<dyn Guard> = Arc::new(guard_fn(move |_, _| *logged_in));
            Some(guard)
        });

        let guard = definition.compile("admin", &deps).unwrap();

        assert!(matches!(guard.check(&home(), None).await, GuardOutcome::Block));
    }

    #[test]
    fn factory_without_guard_fails_with_segment() {
        let definition = HookDefinition::factory(|_| None);

        let error = match definition.compile("admin", &DependencyMap::new()) {
            Ok(_) => panic!("factory yielded no guard"),
            Err(error) => error,
        };

        assert_eq!(error.code(), ErrorCode::InvalidHandler);
        assert_eq!(error.segment(), Some("admin"));
    }

    #[tokio::test]
    async fn async_closure_guard_resolves() {
        let guard = async_guard_fn(|to: State, _from: Option<State>| async move {
            to.param("id").is_some()
        });

        assert!(matches!(guard.check(&home(), None).await, GuardOutcome::Block));
        assert!(matches!(
            guard.check(&home().with_param("id", 1), None).await,
            GuardOutcome::Allow
        ));
    }

    #[test]
    fn result_conversion_maps_errors_to_reject() {
        let outcome: GuardOutcome =
            Err::<bool, _>(RouterError::new(ErrorCode::TransitionErr)).into();

        assert!(matches!(outcome, GuardOutcome::Reject(_)));
        assert!(GuardOutcome::from(home()).is_allowed());
    }
}
