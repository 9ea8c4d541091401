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

//! Transition-wide interceptors run before any guard.

use crate::dependencies::Dependencies;
use crate::error::{ErrorCode, PanicError, RouterError};
use crate::lifecycle::{apply_outcome, cancelled_error, CancelProbe, GuardOutcome};
use crate::observability::events;
use crate::state::State;
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

const COMPONENT: &str = "middleware";

/// Interceptor consulted once per transition, in registration order.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, to: &State, from: Option<&State>) -> GuardOutcome;
}

/// Synchronous closure middleware built by [`middleware_fn`].
pub struct FnMiddleware<F>(F);

#[async_trait]
impl<F, O> Middleware for FnMiddleware<F>
where
    F: Fn(&State, Option<&State>) -> O + Send + Sync,
    O: Into<GuardOutcome>,
{
    async fn handle(&self, to: &State, from: Option<&State>) -> GuardOutcome {
        (self.0)(to, from).into()
    }
}

pub fn middleware_fn<F, O>(handle: F) -> FnMiddleware<F>
where
    F: Fn(&State, Option<&State>) -> O + Send + Sync,
    O: Into<GuardOutcome>,
{
    FnMiddleware(handle)
}

/// Asynchronous closure middleware built by [`async_middleware_fn`].
pub struct AsyncFnMiddleware<F>(F);

#[async_trait]
impl<F, Fut, O> Middleware for AsyncFnMiddleware<F>
where
    F: Fn(State, Option<State>) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send,
    O: Into<GuardOutcome>,
{
    async fn handle(&self, to: &State, from: Option<&State>) -> GuardOutcome {
        (self.0)(to.clone(), from.cloned()).await.into()
    }
}

pub fn async_middleware_fn<F, Fut, O>(handle: F) -> AsyncFnMiddleware<F>
where
    F: Fn(State, Option<State>) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send,
    O: Into<GuardOutcome>,
{
    AsyncFnMiddleware(handle)
}

pub type MiddlewareFactory =
    Box<dyn FnOnce(&dyn Dependencies) -> Option<Arc<dyn Middleware>> + Send>;

/// What a caller may pass to `use_middleware`. Factories run once, at registration.
pub enum MiddlewareDefinition {
    Middleware(Arc<dyn Middleware>),
    Factory(MiddlewareFactory),
}

impl MiddlewareDefinition {
    pub fn middleware(middleware: impl Middleware + 'static) -> Self {
        MiddlewareDefinition::Middleware(Arc::new(middleware))
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: FnOnce(&dyn Dependencies) -> Option<Arc<dyn Middleware>> + Send + 'static,
    {
        MiddlewareDefinition::Factory(Box::new(factory))
    }

    pub(crate) fn compile(
        self,
        dependencies: &dyn Dependencies,
    ) -> Result<Arc<dyn Middleware>, RouterError> {
        match self {
            MiddlewareDefinition::Middleware(middleware) => Ok(middleware),
            MiddlewareDefinition::Factory(factory) => factory(dependencies).ok_or_else(|| {
                RouterError::new(ErrorCode::InvalidHandler)
                    .with_message("middleware factory did not produce a middleware")
            }),
        }
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareDefinition {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        MiddlewareDefinition::Middleware(middleware)
    }
}

impl<M: Middleware + 'static> From<M> for MiddlewareDefinition {
    fn from(middleware: M) -> Self {
        MiddlewareDefinition::middleware(middleware)
    }
}

impl Debug for MiddlewareDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MiddlewareDefinition::Middleware(_) => f.write_str("Middleware(..)"),
            MiddlewareDefinition::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Ordered middleware owned by one router.
#[derive(Default)]
pub(crate) struct MiddlewareChain {
    entries: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub(crate) fn add(
        &mut self,
        definition: MiddlewareDefinition,
        dependencies: &dyn Dependencies,
    ) -> Result<(), RouterError> {
        let middleware = definition.compile(dependencies).map_err(|err| {
            error!(
                event = events::MIDDLEWARE_REGISTER_FAILED,
                component = COMPONENT,
                err = %err,
                "middleware registration failed"
            );
            err
        })?;
        self.entries.push(middleware);
        debug!(
            event = events::MIDDLEWARE_REGISTER_OK,
            component = COMPONENT,
            count = self.entries.len(),
            "middleware registered"
        );
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Middleware>> {
        self.entries.clone()
    }
}

/// Runs `chain` sequentially. Any failure is reported as `TRANSITION_ERR`.
pub(crate) async fn run_middleware(
    chain: Vec<Arc<dyn Middleware>>,
    to: &State,
    from: Option<&State>,
    is_cancelled: CancelProbe<'_>,
) -> Result<State, RouterError> {
    let mut running = to.clone();
    for (index, middleware) in chain.into_iter().enumerate() {
        let result = AssertUnwindSafe(middleware.handle(&running, from))
            .catch_unwind()
            .await;

        if is_cancelled() {
            debug!(
                event = events::TRANSITION_CANCEL_OBSERVED,
                component = COMPONENT,
                index,
                "cancellation observed after middleware"
            );
            return Err(cancelled_error());
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic = PanicError::from_payload(payload);
                error!(
                    event = events::MIDDLEWARE_BLOCKED,
                    component = COMPONENT,
                    index,
                    err = %panic,
                    "middleware panicked"
                );
                return Err(RouterError::new(ErrorCode::TransitionErr)
                    .with_message("middleware panicked")
                    .with_cause(panic));
            }
        };

        running = apply_outcome(outcome, running, ErrorCode::TransitionErr, None).map_err(|err| {
            debug!(
                event = events::MIDDLEWARE_BLOCKED,
                component = COMPONENT,
                index,
                err = %err,
                "middleware stopped the transition"
            );
            err
        })?;
    }
    Ok(running)
}
