//! Integration tests for middleware composition.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert2::check;
use bytes::Bytes;
use swirl::middleware::{BoxedHook, Middleware, Next, compose, from_fn};
use swirl::tower::util::BoxCloneService;
use swirl::tower::{ServiceExt, service_fn};
use swirl::{
    Config, DataSource, Error, Fetcher, HookRequest, Key, Swr, SwrConfig, SwrResponse,
};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().expect("lock").clone()
}

/// Middleware recording its entry and exit.
fn tag(name: &'static str, log: &Log) -> Middleware {
    let log = Arc::clone(log);
    from_fn(move |request: HookRequest, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().expect("lock").push(format!("enter {name}"));
            let response = next.run(request).await;
            log.lock().expect("lock").push(format!("exit {name}"));
            response
        }
    })
    .named(name)
}

/// Terminal hook recording the key and config it receives, then calling the fetcher.
fn recording_terminal(log: &Log) -> BoxedHook {
    let log = Arc::clone(log);
    BoxCloneService::new(service_fn(move |request: HookRequest| {
        let log = Arc::clone(&log);
        async move {
            log.lock().expect("lock").push("terminal".to_string());
            let (key, fetcher, _config) = request.into_parts();
            let data = fetcher.fetch(key.clone()).await?;
            Ok::<_, Error>(SwrResponse::new(key, data, DataSource::Fetched))
        }
    }))
}

/// Fetcher counting its calls and echoing the key.
fn counting_fetcher(calls: &Arc<AtomicU32>) -> Fetcher {
    let calls = Arc::clone(calls);
    Fetcher::new(move |key: Key| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(Bytes::from(key.to_string())) }
    })
}

fn request(key: &str, fetcher: Fetcher) -> HookRequest {
    HookRequest::new(key, fetcher, Config::default())
}

/// Test that the first middleware is entered first and exited last.
#[tokio::test]
async fn test_entry_exit_order() {
    let log = log();
    let swr = Swr::builder()
        .with(tag("a", &log))
        .with(tag("b", &log))
        .with(tag("c", &log))
        .build();

    let calls = Arc::new(AtomicU32::new(0));
    let response = swr
        .hook()
        .call("/order", counting_fetcher(&calls))
        .await
        .expect("response");

    check!(response.source() == DataSource::Fetched);
    check!(
        entries(&log)
            == [
                "enter a", "enter b", "enter c", "exit c", "exit b", "exit a"
            ]
    );
    check!(calls.load(Ordering::SeqCst) == 1);
}

/// Test that composing an empty list is the terminal hook itself.
#[tokio::test]
async fn test_empty_composition_is_identity() {
    let log = log();
    let calls = Arc::new(AtomicU32::new(0));

    let direct = recording_terminal(&log)
        .oneshot(request("/id", counting_fetcher(&calls)))
        .await
        .expect("direct");
    let composed = compose(&[], recording_terminal(&log))
        .oneshot(request("/id", counting_fetcher(&calls)))
        .await
        .expect("composed");

    check!(direct == composed);
    check!(entries(&log) == ["terminal", "terminal"]);
}

/// Test that nesting compositions is the same as composing the concatenation.
#[tokio::test]
async fn test_nested_composition_matches_flat() {
    let calls = Arc::new(AtomicU32::new(0));

    let flat_log = log();
    let flat = compose(
        &[tag("a", &flat_log), tag("b", &flat_log), tag("c", &flat_log)],
        recording_terminal(&flat_log),
    );
    flat.oneshot(request("/x", counting_fetcher(&calls)))
        .await
        .expect("flat");

    let nested_log = log();
    let inner = compose(
        &[tag("b", &nested_log), tag("c", &nested_log)],
        recording_terminal(&nested_log),
    );
    let nested = compose(&[tag("a", &nested_log)], inner);
    nested
        .oneshot(request("/x", counting_fetcher(&calls)))
        .await
        .expect("nested");

    check!(entries(&flat_log) == entries(&nested_log));
}

/// Test that nested scopes and call-site middleware compose like one flat list.
#[tokio::test]
async fn test_scopes_concatenate_middleware() {
    let calls = Arc::new(AtomicU32::new(0));

    let flat_log = log();
    let flat = Swr::builder()
        .with(tag("a", &flat_log))
        .with(tag("b", &flat_log))
        .with(tag("c", &flat_log))
        .build();
    flat.hook()
        .call("/scoped", counting_fetcher(&calls))
        .await
        .expect("flat");

    let scoped_log = log();
    let root = Swr::builder().with(tag("a", &scoped_log)).build();
    let nested = root.scope(SwrConfig::new().with(tag("b", &scoped_log)));
    nested
        .hook_with(&[tag("c", &scoped_log)])
        .call("/scoped-too", counting_fetcher(&calls))
        .await
        .expect("scoped");

    check!(entries(&flat_log) == entries(&scoped_log));
}

/// Test that call-site middleware run inside every scope middleware.
#[tokio::test]
async fn test_call_site_middleware_is_innermost() {
    let log = log();
    let swr = Swr::builder().with(tag("scope", &log)).build();
    let calls = Arc::new(AtomicU32::new(0));

    swr.hook_with(&[tag("local", &log)])
        .call("/local", counting_fetcher(&calls))
        .await
        .expect("response");

    check!(
        entries(&log) == ["enter scope", "enter local", "exit local", "exit scope"]
    );
}

/// Test that a replaced fetcher is the one reaching the terminal hook.
#[tokio::test]
async fn test_replaced_fetcher_reaches_terminal() {
    let original_calls = Arc::new(AtomicU32::new(0));
    let replacement = Fetcher::new(|_key: Key| async { Ok(Bytes::from("replaced")) });

    let swap = from_fn(move |request: HookRequest, next: Next| {
        let replacement = replacement.clone();
        async move { next.run(request.with_fetcher(replacement)).await }
    });

    let swr = Swr::builder().with(swap).build();
    let response = swr
        .hook()
        .call("/swap", counting_fetcher(&original_calls))
        .await
        .expect("response");

    check!(response.data() == Some(&Bytes::from("replaced")));
    check!(original_calls.load(Ordering::SeqCst) == 0);
}

/// Test that a rewritten key is the one fetched and cached.
#[tokio::test]
async fn test_rewritten_key_reaches_fetcher() {
    let prefix = from_fn(|mut request: HookRequest, next: Next| async move {
        if let Some(path) = request.key().as_str() {
            *request.key_mut() = Key::from(format!("/v2{path}"));
        }
        next.run(request).await
    });

    let swr = Swr::builder().with(prefix).build();
    let calls = Arc::new(AtomicU32::new(0));
    let response = swr
        .hook()
        .call("/users", counting_fetcher(&calls))
        .await
        .expect("response");

    check!(response.key() == &Key::from("/v2/users"));
    check!(response.data() == Some(&Bytes::from("/v2/users")));
    check!(swr.cache().get("/v2/users").is_some());
    check!(swr.cache().get("/users").is_none());
}

/// Test that a middleware can patch the config seen by inner hooks.
#[tokio::test(start_paused = true)]
async fn test_config_patch_applies_downstream() {
    let no_retry = from_fn(|mut request: HookRequest, next: Next| async move {
        request.config_mut().error_retry_count = 0;
        next.run(request).await
    });

    let calls = Arc::new(AtomicU32::new(0));
    let failing = {
        let calls = Arc::clone(&calls);
        Fetcher::new(move |_key: Key| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::connection("refused")) }
        })
    };

    let swr = Swr::builder()
        .error_retry_interval(Duration::from_millis(1))
        .with(no_retry)
        .build();
    let err = swr
        .hook()
        .call("/patched", failing)
        .await
        .expect_err("should fail");

    check!(err.is_connection());
    check!(calls.load(Ordering::SeqCst) == 1);
}

/// Test that a middleware answering by itself never reaches the fetcher.
#[tokio::test]
async fn test_short_circuit_skips_terminal() {
    let log = log();
    let answer = from_fn(|request: HookRequest, _next: Next| async move {
        Ok(SwrResponse::new(
            request.key().clone(),
            Bytes::from("canned"),
            DataSource::Cache,
        ))
    });

    let calls = Arc::new(AtomicU32::new(0));
    let hook = compose(
        &[tag("outer", &log), answer, tag("inner", &log)],
        recording_terminal(&log),
    );
    let response = hook
        .oneshot(request("/canned", counting_fetcher(&calls)))
        .await
        .expect("response");

    check!(response.data() == Some(&Bytes::from("canned")));
    check!(entries(&log) == ["enter outer", "exit outer"]);
    check!(calls.load(Ordering::SeqCst) == 0);
}

/// Test that fetch errors pass through every wrapper unchanged.
#[tokio::test]
async fn test_errors_propagate_unchanged() {
    let log = log();
    let swr = Swr::builder()
        .error_retry_count(0)
        .with(tag("a", &log))
        .with(tag("b", &log))
        .build();

    let not_found = Fetcher::new(|_key: Key| async { Err(Error::http(404, "Not Found")) });
    let err = swr
        .hook()
        .call("/missing", not_found)
        .await
        .expect_err("should fail");

    check!(err.status() == Some(404));
    check!(entries(&log) == ["enter a", "enter b", "exit b", "exit a"]);
}

/// Test that a middleware error stops the chain.
#[tokio::test]
async fn test_middleware_error_stops_chain() {
    let log = log();
    let deny = from_fn(|_request: HookRequest, _next: Next| async {
        Err(Error::middleware("denied"))
    });

    let calls = Arc::new(AtomicU32::new(0));
    let swr = Swr::builder()
        .with(tag("outer", &log))
        .with(deny)
        .with(tag("inner", &log))
        .build();
    let err = swr
        .hook()
        .call("/denied", counting_fetcher(&calls))
        .await
        .expect_err("should fail");

    check!(matches!(err, Error::Middleware(ref msg) if msg == "denied"));
    check!(entries(&log) == ["enter outer", "exit outer"]);
    check!(calls.load(Ordering::SeqCst) == 0);
}

/// Test that a middleware listed twice wraps twice.
#[tokio::test]
async fn test_duplicate_middleware_wrap_independently() {
    let log = log();
    let twice = tag("dup", &log);
    let swr = Swr::builder().with(twice.clone()).with(twice).build();

    let calls = Arc::new(AtomicU32::new(0));
    swr.hook()
        .call("/dup", counting_fetcher(&calls))
        .await
        .expect("response");

    check!(entries(&log) == ["enter dup", "enter dup", "exit dup", "exit dup"]);
}

/// Test that state created when a middleware is applied belongs to one hook.
#[tokio::test]
async fn test_middleware_state_is_per_hook() {
    let counter = Middleware::new(|next: BoxedHook| {
        let seen = Arc::new(AtomicU32::new(0));
        BoxCloneService::new(service_fn(move |request: HookRequest| {
            let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
            let next = next.clone();
            async move {
                let response = next.oneshot(request).await?;
                let key = response.key().clone();
                Ok::<_, Error>(SwrResponse::new(
                    key,
                    Bytes::from(n.to_string()),
                    response.source(),
                ))
            }
        }))
    })
    .named("counter");

    let swr = Swr::builder().with(counter).build();
    let calls = Arc::new(AtomicU32::new(0));
    let first = swr.hook();
    let second = swr.hook();

    for _ in 0..3 {
        first
            .call("/n", counting_fetcher(&calls))
            .await
            .expect("first");
    }
    let other = second
        .call("/n", counting_fetcher(&calls))
        .await
        .expect("second");

    check!(other.data() == Some(&Bytes::from("1")));
    let again = first
        .call("/n", counting_fetcher(&calls))
        .await
        .expect("first again");
    check!(again.data() == Some(&Bytes::from("4")));
}

/// Test that middleware names are visible in the scope configuration.
#[test]
fn test_scope_lists_middleware_names() {
    let log = log();
    let root = Swr::builder().with(tag("a", &log)).with_logging().build();
    let nested = root.scope(SwrConfig::new().with(tag("b", &log)));

    let names: Vec<_> = nested
        .config()
        .middleware()
        .iter()
        .map(Middleware::name)
        .collect();
    check!(names == ["a", "LoggingLayer", "b"]);
}
