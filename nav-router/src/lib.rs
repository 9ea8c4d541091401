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

//! # nav-router
//!
//! `nav-router` is a framework-agnostic navigation engine. Given a tree of named
//! routes it manages the router lifecycle, runs guarded and cancellable
//! transitions between states, and notifies listeners of lifecycle events.
//!
//! ```
//! use nav_router::{
//!     guard_fn, NavigationOptions, Params, RouteDefinition, Router, RouterEvent, RouterOptions,
//!     StaticRouteTree,
//! };
//!
//! # futures::executor::block_on(async {
//! let routes = StaticRouteTree::from_routes([
//!     RouteDefinition::new("home", "/"),
//!     RouteDefinition::new("users", "/users"),
//!     RouteDefinition::new("admin", "/admin"),
//! ])
//! .unwrap();
//! let router = Router::new(routes, RouterOptions::default().with_default_route("home")).unwrap();
//!
//! router.add_activate_guard("admin", false).unwrap();
//! router
//!     .add_deactivate_guard("users", guard_fn(|_, _| true))
//!     .unwrap();
//!
//! router.start("/").await.unwrap();
//! let state = router
//!     .navigate("users", Params::new(), NavigationOptions::default())
//!     .await
//!     .unwrap();
//! assert_eq!(state.name(), "users");
//!
//! let blocked = router
//!     .navigate("admin", Params::new(), NavigationOptions::default())
//!     .await
//!     .unwrap_err();
//! assert_eq!(blocked.code().as_str(), "CANNOT_ACTIVATE");
//! assert_eq!(router.get_state().unwrap().name(), "users");
//!
//! router.dispose();
//! assert!(!router.is_active());
//! assert!(!router.has_listeners(RouterEvent::TransitionSuccess));
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - State/error model: immutable [`State`] snapshots and [`RouterError`]
//! - Event core: [`EventBus`] with duplicate, cardinality and recursion guards
//! - Lifecycle: per-segment guards, compiled at registration and run in order
//! - Middleware: transition-wide interceptors run before any guard
//! - Transition: one state machine per navigation attempt, cancellable between steps
//! - Router: top-level lifecycle state machine and public facade
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Applications and tests are responsible for one-time `tracing_subscriber`
//! initialization.

mod config;
pub use config::{
    ConfigError, EventLimits, HookLimits, RouterOptions, DEFAULT_ERROR_HOOKS,
    DEFAULT_MAX_EVENT_DEPTH, DEFAULT_MAX_HOOKS, DEFAULT_MAX_LISTENERS, DEFAULT_WARN_HOOKS,
    DEFAULT_WARN_LISTENERS,
};

mod dependencies;
pub use dependencies::{get_as, Dependencies, Dependency, DependencyMap};

mod error;
pub use error::{ErrorCode, PanicError, ReservedFieldError, RouterError, RESERVED_FIELDS};

pub mod event_bus;
pub use event_bus::{
    EventArgs, EventBus, EventError, Listener, ListenerResult, RouterEvent, Subscription,
    ALL_ROUTER_EVENTS,
};

mod lifecycle;
pub use lifecycle::{
    async_guard_fn, guard_fn, AsyncFnGuard, FnGuard, Guard, GuardFactory, GuardOutcome,
    HookDefinition, HookKind,
};

mod middleware;
pub use middleware::{
    async_middleware_fn, middleware_fn, AsyncFnMiddleware, FnMiddleware, Middleware,
    MiddlewareDefinition, MiddlewareFactory,
};

#[doc(hidden)]
pub mod observability;

mod plugin;
pub use plugin::{plugin_fn, FnPlugin, Plugin};

mod route_tree;
pub use route_tree::{
    compute_transition_path, is_valid_route_name, name_segments, RouteDefinition, RouteTree,
    RouteTreeError, StaticRouteTree, TransitionPath,
};

mod router;
pub use router::{Router, RouterPhase, RouterSignal, RouterSubscription, StartTarget, ALL_ROUTER_PHASES};

mod state;
pub use state::{
    AttemptedRedirect, NavigationOptions, Params, State, StateMeta, MIDDLEWARE_PARAMS,
};

mod transition;
pub use transition::{TransitionPhase, TransitionSignal, ALL_TRANSITION_PHASES};
