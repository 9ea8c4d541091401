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

mod support;

use nav_router::{
    ErrorCode, EventLimits, NavigationOptions, Params, RouterEvent, RouterOptions, RouterPhase,
    StartTarget, State,
};
use navigation_test_utils::{fixture_router, init_logging, EventRecorder, RecordedEvent};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn start_then_navigate_emits_events_in_order() {
    init_logging();
    let router = support::router();
    let recorder = EventRecorder::attach(&router).unwrap();

    router.start("/home").await.unwrap();
    recorder.clear();
    let state = support::navigate(&router, "users").await.unwrap();

    assert_eq!(state.name(), "users");
    assert_eq!(router.get_state().unwrap().name(), "users");
    assert_eq!(
        recorder.records(),
        vec![
            RecordedEvent {
                event: RouterEvent::TransitionStart,
                to: Some("users".to_string()),
                from: Some("home".to_string()),
                error: None,
            },
            RecordedEvent {
                event: RouterEvent::TransitionSuccess,
                to: Some("users".to_string()),
                from: Some("home".to_string()),
                error: None,
            },
        ]
    );
}

#[tokio::test]
async fn start_emits_router_start_before_transition_success() {
    init_logging();
    let router = support::router();
    let recorder = EventRecorder::attach(&router).unwrap();

    let state = router.start(StartTarget::Default).await.unwrap();

    assert_eq!(state.name(), "home");
    assert_eq!(router.phase(), RouterPhase::Ready);
    assert!(router.is_active());
    assert_eq!(
        recorder.events(),
        vec![
            RouterEvent::TransitionStart,
            RouterEvent::RouterStart,
            RouterEvent::TransitionSuccess,
        ]
    );
}

#[tokio::test]
async fn success_event_carries_navigation_options() {
    init_logging();
    let router = support::started_router().await;
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    router
        .add_event_listener(
            RouterEvent::TransitionSuccess,
            Arc::new(move |args: &nav_router::EventArgs| -> nav_router::ListenerResult {
                *sink.lock().unwrap() = args.options.clone();
                Ok(())
            }),
        )
        .unwrap();

    let options = NavigationOptions::default().with_custom("source", "menu");
    let state = router
        .navigate("settings", Params::new(), options.clone())
        .await
        .unwrap();

    assert_eq!(state.meta().options, options);
    assert_eq!(seen.lock().unwrap().as_ref(), Some(&options));
}

#[tokio::test]
async fn transition_ids_increase_monotonically() {
    init_logging();
    let router = support::started_router().await;
    let first = router.get_state().unwrap().meta().id;

    let second = support::navigate(&router, "users").await.unwrap().meta().id;
    let third = support::navigate(&router, "settings").await.unwrap().meta().id;

    assert!(first < second && second < third);
}

#[tokio::test]
async fn unknown_route_is_rejected_and_state_kept() {
    init_logging();
    let router = support::started_router().await;
    let recorder = EventRecorder::attach(&router).unwrap();

    support::assert_code(
        support::navigate(&router, "missing").await,
        ErrorCode::RouteNotFound,
    );

    assert_eq!(router.get_state().unwrap().name(), "home");
    assert_eq!(
        recorder.records(),
        vec![RecordedEvent {
            event: RouterEvent::TransitionError,
            to: None,
            from: Some("home".to_string()),
            error: Some(ErrorCode::RouteNotFound),
        }]
    );
}

#[tokio::test]
async fn same_state_requires_reload_or_force() {
    init_logging();
    let router = support::started_router().await;

    support::assert_code(
        support::navigate(&router, "home").await,
        ErrorCode::SameStates,
    );
    let reloaded = router
        .navigate("home", Params::new(), NavigationOptions::reload())
        .await
        .unwrap();
    assert!(reloaded.meta().options.reload);

    let with_param = router
        .navigate(
            "home",
            Params::from([("tab".to_string(), json!("news"))]),
            NavigationOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(with_param.param("tab"), Some(&json!("news")));
}

#[tokio::test]
async fn navigate_before_start_is_not_started() {
    init_logging();
    let router = support::router();
    let recorder = EventRecorder::attach(&router).unwrap();

    support::assert_code(
        support::navigate(&router, "users").await,
        ErrorCode::NotStarted,
    );

    assert!(recorder.records().is_empty());
    assert_eq!(router.get_state(), None);
}

#[tokio::test]
async fn second_start_is_already_started() {
    init_logging();
    let router = support::started_router().await;

    support::assert_code(router.start("/users").await, ErrorCode::AlreadyStarted);
    assert_eq!(router.get_state().unwrap().name(), "home");
}

#[tokio::test]
async fn unmatched_start_path_falls_back_to_default_route() {
    init_logging();
    let router = support::router();

    let state = router.start("/does/not/exist").await.unwrap();

    assert_eq!(state.name(), "home");
}

#[tokio::test]
async fn start_without_default_route_fails_and_stays_idle() {
    init_logging();
    let router = nav_router::Router::new(
        navigation_test_utils::fixture_routes(),
        RouterOptions::default(),
    )
    .unwrap();

    support::assert_code(router.start("/nowhere").await, ErrorCode::RouteNotFound);
    assert_eq!(router.phase(), RouterPhase::Idle);

    let state = router.start(State::new("users", "/users")).await.unwrap();
    assert_eq!(state.name(), "users");
}

#[tokio::test]
async fn blocked_start_reverts_to_idle_without_router_start() {
    init_logging();
    let router = support::router();
    let recorder = EventRecorder::attach(&router).unwrap();
    router.add_activate_guard("home", false).unwrap();

    support::assert_code(router.start("/").await, ErrorCode::CannotActivate);

    assert_eq!(router.phase(), RouterPhase::Idle);
    assert!(!router.is_active());
    assert_eq!(recorder.count(RouterEvent::RouterStart), 0);
    assert_eq!(recorder.count(RouterEvent::TransitionError), 1);

    router.remove_activate_guard("home").unwrap();
    assert!(router.start("/").await.is_ok());
}

#[tokio::test]
async fn stop_emits_router_stop_once() {
    init_logging();
    let router = support::started_router().await;
    let recorder = EventRecorder::attach(&router).unwrap();

    router.stop().unwrap();
    router.stop().unwrap();

    assert_eq!(recorder.events(), vec![RouterEvent::RouterStop]);
    assert_eq!(router.phase(), RouterPhase::Idle);
    assert_eq!(router.get_state(), None);
    assert!(router.start("/users").await.is_ok());
}

#[tokio::test]
async fn dispose_rejects_mutations_and_keeps_queries() {
    init_logging();
    let router = support::started_router().await;
    let recorder = EventRecorder::attach(&router).unwrap();
    let teardowns = Arc::new(AtomicUsize::new(0));
    let counter = teardowns.clone();
    router
        .use_plugin(nav_router::plugin_fn("analytics", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    router
        .use_plugin(nav_router::plugin_fn("broken", || panic!("teardown failed")))
        .unwrap();

    router.dispose();
    router.dispose();

    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.events(), vec![RouterEvent::RouterStop]);
    assert!(!router.is_active());
    assert_eq!(router.get_state(), None);
    assert_eq!(router.phase(), RouterPhase::Disposed);
    assert!(!router.has_listeners(RouterEvent::RouterStop));

    support::assert_code(router.start("/").await, ErrorCode::RouterDisposed);
    support::assert_code(
        support::navigate(&router, "users").await,
        ErrorCode::RouterDisposed,
    );
    let disposed = |result: Result<(), nav_router::RouterError>| {
        assert_eq!(result.unwrap_err().code(), ErrorCode::RouterDisposed);
    };
    disposed(router.stop());
    disposed(router.cancel().map(|_| ()));
    disposed(router.add_activate_guard("users", true));
    disposed(router.remove_deactivate_guard("users").map(|_| ()));
    disposed(router.use_middleware(nav_router::middleware_fn(|_, _| true)));
    disposed(router.clear_middleware());
    disposed(router.set_limits(EventLimits::unbounded()));
    disposed(router.subscribe(|_, _| {}).map(|_| ()));
}

#[tokio::test]
async fn subscribe_receives_each_successful_transition() {
    init_logging();
    let router = support::started_router().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = router
        .subscribe(move |to: &State, from: Option<&State>| {
            sink.lock().unwrap().push((
                to.name().to_string(),
                from.map(|state| state.name().to_string()),
            ));
        })
        .unwrap();

    support::navigate(&router, "users").await.unwrap();
    router.add_activate_guard("admin", false).unwrap();
    let _ = support::navigate(&router, "admin").await;
    subscription.unsubscribe();
    support::navigate(&router, "settings").await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("users".to_string(), Some("home".to_string()))]
    );
}

#[tokio::test]
async fn callbacks_receive_the_result_and_may_panic() {
    init_logging();
    let router = support::router();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let started = router
        .start_with_callback("/", move |result| {
            sink.lock().unwrap().push(result.map(|state| state.name().to_string()));
        })
        .await;
    assert!(started.is_ok());

    let navigated = router
        .navigate_with_callback(
            "users",
            Params::new(),
            NavigationOptions::default(),
            |_| panic!("callback failure"),
        )
        .await;

    assert_eq!(navigated.unwrap().name(), "users");
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(router.get_state().unwrap().name(), "users");
}

#[tokio::test]
async fn listener_limits_surface_as_router_errors() {
    init_logging();
    let router = fixture_router(RouterOptions::default().with_limits(EventLimits {
        max_listeners: 1,
        warn_listeners: 0,
        max_event_depth: 5,
    }));

    router.subscribe(|_, _| {}).unwrap();
    let error = router.subscribe(|_, _| {}).unwrap_err();
    assert_eq!(error.code(), ErrorCode::ListenerLimit);
    assert_eq!(router.listener_count(RouterEvent::TransitionSuccess), 1);

    router.set_limits(EventLimits::unbounded()).unwrap();
    assert!(router.subscribe(|_, _| {}).is_ok());
    assert_eq!(router.limits(), EventLimits::unbounded());
}

#[tokio::test]
async fn listener_may_navigate_from_a_success_event() {
    init_logging();
    let router = support::started_router().await;
    let follower = router.clone();
    let handle = Arc::new(Mutex::new(None));
    let slot = handle.clone();
    router
        .subscribe(move |to: &State, _| {
            if to.name() == "users" {
                let follower = follower.clone();
                *slot.lock().unwrap() = Some(tokio::spawn(async move {
                    support::navigate(&follower, "users.view").await
                }));
            }
        })
        .unwrap();

    support::navigate(&router, "users").await.unwrap();
    let follow_up = handle.lock().unwrap().take().unwrap();
    let redirected = follow_up.await.unwrap();

    assert_eq!(redirected.unwrap().name(), "users.view");
    assert_eq!(router.get_state().unwrap().name(), "users.view");
}
