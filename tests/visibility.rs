use element_commands::protocol::{ProtocolResult, actions};
use element_commands::scripted::ScriptedBackend;
use element_commands::{CommandError, CommandResult, Session, Settings};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn backend() -> Arc<ScriptedBackend> {
    Arc::new(
        ScriptedBackend::new()
            .with_elements("#main ul li a", &["a-0", "a-1", "a-2"])
            .with_response(actions::IS_ELEMENT_DISPLAYED, ProtocolResult::with_status(0, true))
            .with_response(actions::GET_ELEMENT_PROPERTY, ProtocolResult::from_value(true)),
    )
}

fn established(backend: Arc<ScriptedBackend>, start_process: bool, capabilities: Value) -> Session {
    let mut session = Session::with_backend(Settings::new().start_process(start_process), backend);
    session.establish(&capabilities);
    session
}

#[tokio::test]
async fn test_non_webkit_browsers_use_displayed_check() {
    for (name, version) in [("chrome", "100"), ("firefox", "120"), ("MicrosoftEdge", "13")] {
        let backend = backend();
        let session = established(
            backend.clone(),
            true,
            json!({"browserName": name, "browserVersion": version}),
        );

        let result = session.is_visible("#main ul li a").await.unwrap();

        assert_eq!(result, CommandResult::success(true), "browser {}", name);
        assert_eq!(backend.actions(), vec![actions::IS_ELEMENT_DISPLAYED], "browser {}", name);
    }
}

#[tokio::test]
async fn test_safari_legacy_version_wins() {
    let backend = backend();
    let session = established(
        backend.clone(),
        true,
        json!({"browserName": "Safari", "version": "13", "browserVersion": "9"}),
    );

    let result = session.is_visible("#main ul li a").await.unwrap();

    // hidden => not visible
    assert_eq!(result, CommandResult { status: 0, value: json!(false) });
    assert_eq!(
        backend.calls(),
        vec![(actions::GET_ELEMENT_PROPERTY.to_string(), vec![json!("a-0"), json!("hidden")])]
    );
}

#[tokio::test]
async fn test_safari_legacy_version_below_threshold() {
    let backend = backend();
    let session = established(
        backend.clone(),
        true,
        json!({"browserName": "safari", "version": "11", "browserVersion": "13"}),
    );

    session.is_visible("#main ul li a").await.unwrap();
    assert_eq!(backend.actions(), vec![actions::IS_ELEMENT_DISPLAYED]);
}

#[tokio::test]
async fn test_safari_unparseable_version() {
    let backend = backend();
    let session = established(backend.clone(), true, json!({"browserName": "safari", "browserVersion": "abc"}));

    session.is_visible("#main ul li a").await.unwrap();
    assert_eq!(backend.actions(), vec![actions::IS_ELEMENT_DISPLAYED]);
}

#[tokio::test]
async fn test_safari_remote_driver() {
    let backend = backend();
    let session = established(backend.clone(), false, json!({"browserName": "safari", "browserVersion": "16"}));

    session.is_visible("#main ul li a").await.unwrap();
    assert_eq!(backend.actions(), vec![actions::IS_ELEMENT_DISPLAYED]);
}

#[tokio::test]
async fn test_hidden_property_false_means_visible() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_elements("#x", &["e-1"])
            .with_response(actions::GET_ELEMENT_PROPERTY, ProtocolResult::with_status(0, false)),
    );
    let session = established(backend, true, json!({"browserName": "safari", "browserVersion": "12.1"}));

    let result = session.is_visible("#x").await.unwrap();
    assert_eq!(result, CommandResult::success(true));
}

#[tokio::test]
async fn test_absent_status_normalized() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_elements("#x", &["e-1"])
            .with_response(actions::IS_ELEMENT_DISPLAYED, ProtocolResult::from_value(false)),
    );
    let session = established(backend, false, json!({"browserName": "chrome"}));

    let result = session.is_visible("#x").await.unwrap();
    assert_eq!(result, CommandResult { status: 0, value: json!(false) });
}

#[tokio::test]
async fn test_index_resolves_second_match() {
    let backend = backend();
    let session = established(backend.clone(), false, json!({"browserName": "chrome"}));

    session
        .execute_command("is_visible", &[json!({"selector": "#main ul li a", "index": 1})])
        .await
        .unwrap();

    assert_eq!(backend.calls()[0].1, vec![json!("a-1")]);
}

#[tokio::test]
async fn test_index_beyond_matches_is_not_found() {
    let backend = backend();
    let session = established(backend.clone(), false, json!({"browserName": "chrome"}));

    let result = session
        .execute_command(
            "is_visible",
            &[json!({"selector": "#main ul li a", "index": 3, "timeout": 0, "suppressNotFoundErrors": true})],
        )
        .await
        .unwrap();

    assert_eq!(result, CommandResult::not_found());
}

#[tokio::test(start_paused = true)]
async fn test_suppressed_not_found_never_rejects() {
    let backend = backend();
    let session = established(backend.clone(), false, json!({"browserName": "chrome"}));

    let result = session
        .execute_command("is_visible", &[json!({"selector": "#nothing", "suppressNotFoundErrors": true})])
        .await
        .unwrap();

    assert_eq!(result, CommandResult { status: -1, value: Value::Null });
    assert!(backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_not_found_rejects_after_default_timeout() {
    let backend = backend();
    let session = Session::with_backend(Settings::new().default_timeout_ms(2000), backend.clone());

    let started = tokio::time::Instant::now();
    let err = session.is_visible("#nothing").await.unwrap_err();

    assert!(matches!(err, CommandError::ElementNotFound(_)));
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(backend.lookups("#nothing") > 1);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_explicit_strategy_form() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_elements("//a[@class='first']", &["x-1"])
            .with_response(actions::IS_ELEMENT_DISPLAYED, ProtocolResult::from_value(true)),
    );
    let session = established(backend.clone(), false, json!({"browserName": "chrome"}));

    let result = session
        .execute_command("is_visible", &[json!("xpath"), json!("//a[@class='first']")])
        .await
        .unwrap();

    assert_eq!(result.as_bool(), Some(true));
    assert_eq!(backend.calls()[0].1, vec![json!("x-1")]);
}

#[tokio::test]
async fn test_concurrent_commands_share_session() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_elements("#a", &["e-a"])
            .with_elements("#b", &["e-b"])
            .with_response(actions::IS_ELEMENT_DISPLAYED, ProtocolResult::from_value(true)),
    );
    let session = established(backend.clone(), false, json!({"browserName": "chrome"}));

    let (a, b) = tokio::join!(session.is_visible("#a"), session.is_visible("#b"));

    assert_eq!(a.unwrap(), CommandResult::success(true));
    assert_eq!(b.unwrap(), CommandResult::success(true));

    let mut elements: Vec<Value> = backend.calls().into_iter().flat_map(|(_, args)| args).collect();
    elements.sort_by_key(|v| v.to_string());
    assert_eq!(elements, vec![json!("e-a"), json!("e-b")]);
}
