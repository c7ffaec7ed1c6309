//! End-to-end pipeline integration tests.
//!
//! These tests drive complete invocations through [`HttpFunction::invoke`]
//! and check the observable contract:
//!
//! 1. Before-middlewares run in order and can short-circuit
//! 2. The handler's response replaces the provisional `204`
//! 3. After-middlewares run in order and can short-circuit
//! 4. Failures are classified and handed to exactly one error handler
//! 5. Non-string bodies are normalized to JSON text

use cloudomium_core::{
    BoxFuture, CloudomiumResult, Failure, HttpException, HttpResponse, LambdaOrganizer,
};
use cloudomium_middleware::{HttpFunction, HttpOrganizer};
use cloudomium_test::{
    context_writer, failing_middleware, recording_middleware, CallLog, TestResponse,
};
use serde_json::{json, Value};

/// Per-invocation context shared by the tests.
#[derive(Debug, Default)]
struct Context {
    language: Option<String>,
    trail: Vec<String>,
}

type Organizer = HttpOrganizer<Value, Context>;

type HandlerFuture<'a> = BoxFuture<'a, CloudomiumResult<Option<HttpResponse>>>;

/// A handler that records its call and returns nothing.
fn empty_handler(
    log: &CallLog,
) -> impl for<'a> Fn(&'a Value, &'a mut Context) -> HandlerFuture<'a> + Send + Sync + 'static {
    let log = log.clone();
    move |_event, _ctx| {
        log.record("handler");
        Box::pin(async { Ok(None) })
    }
}

/// A handler that records its call and returns `200` with the given body.
fn ok_handler(
    log: &CallLog,
    body: Value,
) -> impl for<'a> Fn(&'a Value, &'a mut Context) -> HandlerFuture<'a> + Send + Sync + 'static {
    let log = log.clone();
    move |_event, _ctx| {
        log.record("handler");
        let response = HttpResponse::new(200).with_body(body.clone());
        Box::pin(async move { Ok(Some(response)) })
    }
}

/// A handler that records its call and fails.
fn failing_handler(
    log: &CallLog,
    failure: fn() -> Failure,
) -> impl for<'a> Fn(&'a Value, &'a mut Context) -> HandlerFuture<'a> + Send + Sync + 'static {
    let log = log.clone();
    move |_event, _ctx| {
        log.record("handler");
        Box::pin(async move { Err(failure()) })
    }
}

async fn invoke(function: &HttpFunction<Value, Context>) -> TestResponse {
    TestResponse::from(function.invoke(json!({}), Context::default()).await)
}

// ============================================================================
// Before phase
// ============================================================================

#[tokio::test]
async fn test_before_middlewares_run_in_registration_order() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(recording_middleware("first", &log))
        .before(recording_middleware("second", &log))
        .before(recording_middleware("third", &log))
        .execute_fn(empty_handler(&log));

    invoke(&function).await.assert_no_content();
    log.assert_calls(&["first", "second", "third", "handler"]);
}

#[tokio::test]
async fn test_before_failure_short_circuits_everything() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(recording_middleware("first", &log))
        .before(failing_middleware("auth", &log, || {
            HttpException::unauthorized().into()
        }))
        .before(recording_middleware("never_before", &log))
        .after(recording_middleware("never_after", &log))
        .execute_fn(empty_handler(&log));

    let response = invoke(&function).await;
    response.assert_error("Error", "Unauthorized");
    log.assert_calls(&["first", "auth"]);
}

#[tokio::test]
async fn test_context_flows_from_before_middlewares_to_handler() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(context_writer("language", &log, |ctx: &mut Context| {
            ctx.language = Some("fr".to_string());
        }))
        .before_fn("greeting", |_event, ctx, _response| {
            Box::pin(async move {
                let greeting = match ctx.language.as_deref() {
                    Some("fr") => "bonjour",
                    _ => "hello",
                };
                ctx.trail.push(greeting.to_string());
                Ok(())
            })
        })
        .execute_fn(|_event, ctx| {
            Box::pin(async move {
                let body = json!({ "language": ctx.language, "trail": ctx.trail });
                Ok(Some(HttpResponse::new(200).with_body(body)))
            })
        });

    invoke(&function)
        .await
        .assert_status_code(200)
        .assert_json_eq(&json!({ "language": "fr", "trail": ["bonjour"] }));
}

// ============================================================================
// Handler phase
// ============================================================================

#[tokio::test]
async fn test_handler_response_replaces_provisional() {
    let function = Organizer::new().execute_fn(|_event, _ctx| {
        Box::pin(async {
            Ok(Some(
                HttpResponse::new(201).with_header("Location", "/users/7"),
            ))
        })
    });

    let response = invoke(&function).await;
    response
        .assert_status_code(201)
        .assert_header("Location", "/users/7")
        .assert_body_absent();
}

#[tokio::test]
async fn test_handler_response_without_status_is_not_merged() {
    let function = Organizer::new().execute_fn(|_event, _ctx| {
        Box::pin(async { Ok(Some(HttpResponse::default().with_body("text"))) })
    });

    let response = invoke(&function).await;
    assert_eq!(response.status_code(), None);
    response.assert_body_eq("text");
}

#[tokio::test]
async fn test_empty_handler_keeps_204() {
    let log = CallLog::new();
    let function = Organizer::new().execute_fn(empty_handler(&log));

    invoke(&function).await.assert_no_content();
    log.assert_calls(&["handler"]);
}

#[tokio::test]
async fn test_after_middleware_can_change_provisional_status() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after_fn("accepted", |_event, _ctx, response| {
            Box::pin(async move {
                if let Some(response) = response {
                    response.status_code = Some(202);
                }
                Ok(())
            })
        })
        .execute_fn(empty_handler(&log));

    invoke(&function).await.assert_status_code(202).assert_body_absent();
}

#[tokio::test]
async fn test_handler_failure_skips_after_middlewares() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(recording_middleware("before", &log))
        .after(recording_middleware("after", &log))
        .execute_fn(failing_handler(&log, || {
            HttpException::bad_request().with_message("missing id").into()
        }));

    invoke(&function)
        .await
        .assert_error("Error", "missing id");
    log.assert_calls(&["before", "handler"]);
}

// ============================================================================
// After phase
// ============================================================================

#[tokio::test]
async fn test_after_middlewares_run_in_registration_order() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after(recording_middleware("cache", &log))
        .before(recording_middleware("language", &log))
        .after(recording_middleware("cors", &log))
        .execute_fn(ok_handler(&log, json!({ "ok": true })));

    invoke(&function).await.assert_status_code(200);
    log.assert_calls(&["language", "handler", "cache", "cors"]);
}

#[tokio::test]
async fn test_after_middleware_mutates_response() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after_fn("cache_control", |_event, _ctx, response| {
            Box::pin(async move {
                if let Some(response) = response {
                    response.insert_header("Cache-Control", "max-age=60");
                }
                Ok(())
            })
        })
        .after_fn("language", |_event, ctx, response| {
            Box::pin(async move {
                let language = ctx.language.clone().unwrap_or_else(|| "en".to_string());
                if let Some(response) = response {
                    response.insert_header("Content-Language", language);
                }
                Ok(())
            })
        })
        .execute_fn(ok_handler(&log, json!({ "ok": true })));

    invoke(&function)
        .await
        .assert_status_code(200)
        .assert_header("Cache-Control", "max-age=60")
        .assert_header("Content-Language", "en");
}

#[tokio::test]
async fn test_after_failure_short_circuits_remaining_after_middlewares() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after(recording_middleware("first", &log))
        .after(failing_middleware("broken", &log, || Failure::msg("cache offline")))
        .after(recording_middleware("never", &log))
        .execute_fn(ok_handler(&log, json!({ "ok": true })));

    invoke(&function)
        .await
        .assert_error("Error", "cache offline");
    log.assert_calls(&["handler", "first", "broken"]);
}

#[tokio::test]
async fn test_after_failure_does_not_undo_handler_effects() {
    let log = CallLog::new();
    let writes = CallLog::new();
    let handler_writes = writes.clone();

    let function = Organizer::new()
        .after(failing_middleware("broken", &log, || Failure::msg("late failure")))
        .execute_fn(move |_event, _ctx| {
            handler_writes.record("row inserted");
            Box::pin(async { Ok(Some(HttpResponse::new(201))) })
        });

    invoke(&function).await.assert_status_code(500);
    writes.assert_calls(&["row inserted"]);
}

// ============================================================================
// Error handling
// ============================================================================

#[tokio::test]
async fn test_unclassified_failure_becomes_generic_500_with_original_message() {
    let log = CallLog::new();
    let seen = CallLog::new();
    let recorded = seen.clone();

    let function = Organizer::new()
        .before(failing_middleware("db", &log, || {
            Failure::unexpected(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))
        }))
        .error_fn(move |_event, _ctx, exception| {
            recorded.record(format!(
                "{}:{}:{}",
                exception.name(),
                exception.status_code(),
                exception.message()
            ));
            Box::pin(async move { HttpResponse::new(exception.status_code()) })
        })
        .execute_fn(empty_handler(&log));

    invoke(&function).await.assert_status_code(500);
    seen.assert_calls(&["HttpException:500:connection reset"]);
}

#[tokio::test]
async fn test_classified_failure_reaches_error_handler_unchanged() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(failing_middleware("auth", &log, || {
            HttpException::forbidden()
                .with_message("admins only")
                .with_identifier("ACL_DENIED")
                .into()
        }))
        .error_fn(|_event, _ctx, exception| {
            let body = json!({
                "message": exception.message(),
                "identifier": exception.identifier(),
            });
            Box::pin(async move { HttpResponse::new(exception.status_code()).with_body(body) })
        })
        .execute_fn(empty_handler(&log));

    let response = invoke(&function).await;
    response.assert_status_code(403);
    // Error handler output is returned as is, without normalization.
    assert_eq!(
        response.body(),
        Some(&json!({ "message": "admins only", "identifier": "ACL_DENIED" }))
    );
}

#[tokio::test]
async fn test_default_error_handler_ignores_exception_status() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after(failing_middleware("cache", &log, || HttpException::not_found().into()))
        .execute_fn(ok_handler(&log, json!({ "ok": true })));

    let response = invoke(&function).await;
    response.assert_error("Error", "Not Found");
    assert_eq!(
        response.json_value().unwrap().as_object().map(serde_json::Map::len),
        Some(2)
    );
}

#[tokio::test]
async fn test_custom_error_handler_maps_status() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after(failing_middleware("cache", &log, || HttpException::not_found().into()))
        .error_fn(|_event, _ctx, exception| {
            Box::pin(async move {
                HttpResponse::new(exception.status_code()).with_body(exception.message().to_string())
            })
        })
        .execute_fn(ok_handler(&log, json!({ "ok": true })));

    invoke(&function)
        .await
        .assert_status_code(404)
        .assert_body_eq("Not Found");
}

#[tokio::test]
async fn test_last_registered_error_handler_wins() {
    let log = CallLog::new();
    let function = Organizer::new()
        .error_fn(|_event, _ctx, _exception| Box::pin(async { HttpResponse::new(418) }))
        .error_fn(|_event, _ctx, _exception| Box::pin(async { HttpResponse::new(503) }))
        .execute_fn(failing_handler(&log, || Failure::msg("down")));

    invoke(&function).await.assert_status_code(503);
}

#[tokio::test]
async fn test_error_handler_sees_context_written_before_failure() {
    let log = CallLog::new();
    let function = Organizer::new()
        .before(context_writer("language", &log, |ctx: &mut Context| {
            ctx.language = Some("de".to_string());
        }))
        .before(failing_middleware("auth", &log, || HttpException::unauthorized().into()))
        .error_fn(|_event, ctx, exception| {
            let language = ctx.language.clone();
            Box::pin(async move {
                let mut response = HttpResponse::new(exception.status_code());
                if let Some(language) = language {
                    response.insert_header("Content-Language", language);
                }
                response
            })
        })
        .execute_fn(empty_handler(&log));

    invoke(&function)
        .await
        .assert_status_code(401)
        .assert_header("Content-Language", "de");
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_object_body_is_serialized() {
    let log = CallLog::new();
    let function = Organizer::new().execute_fn(ok_handler(&log, json!({ "ok": true })));

    invoke(&function)
        .await
        .assert_status_code(200)
        .assert_body_eq(r#"{"ok":true}"#);
}

#[tokio::test]
async fn test_string_body_is_untouched() {
    let log = CallLog::new();
    let function = Organizer::new().execute_fn(ok_handler(&log, json!("already text")));

    invoke(&function).await.assert_body_eq("already text");
}

#[tokio::test]
async fn test_body_set_by_after_middleware_is_normalized() {
    let log = CallLog::new();
    let function = Organizer::new()
        .after_fn("envelope", |_event, _ctx, response| {
            Box::pin(async move {
                if let Some(response) = response {
                    response.body = Some(json!({ "data": [1, 2, 3] }));
                }
                Ok(())
            })
        })
        .execute_fn(empty_handler(&log));

    invoke(&function)
        .await
        .assert_status_code(204)
        .assert_body_eq(r#"{"data":[1,2,3]}"#);
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_scenario_ok_handler_without_middlewares() {
    let function = Organizer::new().execute_fn(|_event, _ctx| {
        Box::pin(async { Ok(Some(HttpResponse::new(200).with_body(json!({ "ok": true })))) })
    });

    let wire = function.invoke_json(json!({}), Context::default()).await.unwrap();
    assert_eq!(wire, json!({ "statusCode": 200, "body": r#"{"ok":true}"# }));
}

#[tokio::test]
async fn test_scenario_before_middleware_throws_plain_error() {
    let function = Organizer::new()
        .before_fn("boom", |_event, _ctx, _response| {
            Box::pin(async { Err(Failure::msg("boom")) })
        })
        .execute_fn(|_event, _ctx| Box::pin(async { Ok(None) }));

    let wire = function.invoke_json(json!({}), Context::default()).await.unwrap();
    assert_eq!(
        wire,
        json!({
            "statusCode": 500,
            "body": r#"{"name":"Error","message":"boom"}"#
        })
    );
}

// ============================================================================
// Untyped responses and concurrency
// ============================================================================

#[tokio::test]
async fn test_raw_json_responses() {
    let function = HttpOrganizer::<Value, (), Value>::new()
        .after_fn("stamp", |_event, _ctx, response| {
            Box::pin(async move {
                if let Some(response) = response {
                    response["headers"] = json!({ "X-Stamp": "1" });
                }
                Ok(())
            })
        })
        .execute_fn(|event, _ctx| {
            let body = event.clone();
            Box::pin(async move { Ok(Some(json!({ "statusCode": 200, "body": body }))) })
        });

    let response = function.invoke(json!({ "echo": [true] }), ()).await;
    assert_eq!(
        response,
        json!({
            "statusCode": 200,
            "headers": { "X-Stamp": "1" },
            "body": r#"{"echo":[true]}"#
        })
    );
}

#[tokio::test]
async fn test_metadata_is_captured_by_function() {
    let log = CallLog::new();
    let function = Organizer::new()
        .set_metadata("name", "list-users")
        .set_metadata("retries", 0)
        .set_metadata("public", false)
        .before(recording_middleware("auth", &log))
        .after(recording_middleware("cors", &log))
        .execute_fn(empty_handler(&log));

    assert_eq!(function.name(), "list-users");
    assert_eq!(function.metadata("retries"), Some(&json!(0)));
    assert_eq!(function.metadata("public"), Some(&json!(false)));
    assert_eq!(function.metadata("missing"), None);
    assert_eq!(function.middleware_names(), vec!["auth", "cors"]);
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let function = Organizer::new()
        .before_fn("copy_event", |event, ctx, _response| {
            Box::pin(async move {
                ctx.language = event["language"].as_str().map(str::to_string);
                tokio::task::yield_now().await;
                Ok(())
            })
        })
        .execute_fn(|_event, ctx| {
            Box::pin(async move {
                Ok(Some(
                    HttpResponse::new(200).with_body(json!({ "language": ctx.language })),
                ))
            })
        });

    let mut tasks = Vec::new();
    for language in ["en", "fr", "de", "es", "it", "pt", "nl", "sv"] {
        let function = function.clone();
        tasks.push(tokio::spawn(async move {
            let response = function
                .invoke(json!({ "language": language }), Context::default())
                .await;
            (language, TestResponse::from(response))
        }));
    }

    for task in tasks {
        let (language, response) = task.await.unwrap();
        response.assert_json_eq(&json!({ "language": language }));
    }
}
