//! End-to-end resolution tests across the selection/fallback matrix.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ext_registry::ConnectOptions;
use ext_test_utils::{CallLog, ScriptedFactory, TestRegistry};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_fallback_chain_with_errors_and_absences() {
    let calls = CallLog::new();
    let mut registry = TestRegistry::new();
    registry
        .register(
            "vcs.backend",
            "broken",
            ScriptedFactory::failing("unsupported platform")
                .with_log(calls.clone())
                .into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "declined",
            ScriptedFactory::absent()
                .with_log(calls.clone())
                .into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "working",
            ScriptedFactory::returning("git")
                .with_log(calls.clone())
                .into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "never-reached",
            ScriptedFactory::returning("hg")
                .with_log(calls.clone())
                .into_factory(),
        )
        .unwrap();

    let errors = Arc::new(Mutex::new(Vec::new()));
    let error_sink = Arc::clone(&errors);
    let resolved = registry
        .connect_one(
            &(),
            "vcs.backend",
            ConnectOptions::new().on_error(move |err, info| {
                error_sink
                    .lock()
                    .unwrap()
                    .push(format!("{}: {err}", info.name));
            }),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(resolved.instance, "git");
    assert_eq!(resolved.name, "working");
    // Strict in-order evaluation, short-circuited after the first success.
    assert_eq!(calls.names(), ["broken", "declined", "working"]);
    assert_eq!(*errors.lock().unwrap(), ["broken: unsupported platform"]);
}

#[tokio::test]
async fn test_multi_mixed_outcomes_keep_candidate_order() {
    let mut registry = TestRegistry::new();
    registry
        .register(
            "vcs.backend",
            "slow",
            ScriptedFactory::returning("slow-instance")
                .with_delay(Duration::from_millis(30))
                .into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "failing",
            ScriptedFactory::failing("nope").into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "fast",
            ScriptedFactory::returning("fast-instance").into_factory(),
        )
        .unwrap();

    let resolved = registry
        .connect_all(&(), "vcs.backend", ConnectOptions::new())
        .await
        .unwrap();

    let names: Vec<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
    let instances: Vec<&str> = resolved.iter().map(|r| r.instance.as_str()).collect();
    assert_eq!(names, ["slow", "fast"]);
    assert_eq!(instances, ["slow-instance", "fast-instance"]);
}

#[tokio::test]
async fn test_data_reaches_every_candidate_in_one_call() {
    let calls = CallLog::new();
    let mut registry = TestRegistry::new();
    for name in ["a", "b", "c"] {
        registry
            .register(
                "notify.channel",
                name,
                ScriptedFactory::returning(name)
                    .with_log(calls.clone())
                    .into_factory(),
            )
            .unwrap();
    }

    registry
        .connect_all(
            &(),
            "notify.channel",
            ConnectOptions::new().data("payload".to_string()),
        )
        .await
        .unwrap();

    let data: Vec<Option<String>> = calls.records().into_iter().map(|r| r.data).collect();
    assert_eq!(data, vec![Some("payload".to_string()); 3]);
}

#[tokio::test]
async fn test_required_reports_the_point_alongside_empty_results() {
    let mut registry = TestRegistry::new();
    registry
        .register(
            "vcs.backend",
            "declines",
            ScriptedFactory::absent().into_factory(),
        )
        .unwrap();

    let err = registry
        .connect_one(&(), "vcs.backend", ConnectOptions::new().required())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Extension not found for vcs.backend");

    // Without `required`, the same empty outcome is not an error.
    assert!(
        registry
            .connect_all(&(), "vcs.backend", ConnectOptions::new())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_explicit_alternatives_override_registration_order() {
    let mut registry = TestRegistry::new();
    registry
        .register(
            "vcs.backend",
            "default",
            ScriptedFactory::returning("default-impl").into_factory(),
        )
        .unwrap()
        .register(
            "vcs.backend",
            "preferred",
            ScriptedFactory::returning("preferred-impl").into_factory(),
        )
        .unwrap();

    let resolved = registry
        .connect_one(
            &(),
            "vcs.backend",
            ConnectOptions::new().alternatives(["missing", "preferred", "default"]),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.instance, "preferred-impl");

    let all = registry
        .connect_all(
            &(),
            "vcs.backend",
            ConnectOptions::new().alternatives(["preferred", "default"]),
        )
        .await
        .unwrap();
    let instances: Vec<&str> = all.iter().map(|r| r.instance.as_str()).collect();
    assert_eq!(instances, ["preferred-impl", "default-impl"]);
}

#[tokio::test]
async fn test_opt_in_extension_only_reachable_by_name() {
    let calls = CallLog::new();
    let mut registry = TestRegistry::new();
    registry
        .register(
            "telemetry.sink",
            "side-effects",
            ScriptedFactory::returning("sink")
                .with_log(calls.clone())
                .into_factory()
                .with_auto(false),
        )
        .unwrap();

    assert!(
        registry
            .connect_all(&(), "telemetry.sink", ConnectOptions::new())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(calls.is_empty());

    let resolved = registry
        .connect_one(
            &(),
            "telemetry.sink",
            ConnectOptions::new().name("side-effects"),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.instance, "sink");
    assert_eq!(calls.len(), 1);
}
