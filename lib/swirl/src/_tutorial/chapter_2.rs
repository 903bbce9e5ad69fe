//! # Chapter 2: Writing Middleware
//!
//! A middleware receives the next hook and returns a replacement for it.
//!
//! ## With `from_fn`
//!
//! The simplest way is an async function taking the request and a
//! [`Next`][crate::middleware::Next] handle:
//!
//! ```ignore
//! use swirl::middleware::{from_fn, Next};
//! use swirl::HookRequest;
//!
//! let prefix = from_fn(|mut request: HookRequest, next: Next| async move {
//!     if let Some(path) = request.key().as_str() {
//!         let path = format!("/v2{path}");
//!         *request.key_mut() = path.into();
//!     }
//!     next.run(request).await
//! });
//! ```
//!
//! A middleware may:
//!
//! - rewrite the key, the fetcher or the config before calling `next`
//! - skip `next` entirely and answer by itself
//! - transform the response on the way out
//!
//! Errors flow through untouched unless a middleware chooses to handle them.
//!
//! ## Replacing the Fetcher
//!
//! [`Fetcher::map`][crate::Fetcher::map] wraps a fetcher; the terminal hook
//! only ever sees the fetcher handed down by the last middleware:
//!
//! ```ignore
//! let auth = from_fn(|request: HookRequest, next: Next| async move {
//!     let fetcher = request.fetcher().clone().map(|key, inner| async move {
//!         tracing::debug!(%key, "authenticated fetch");
//!         inner.fetch(key).await
//!     });
//!     next.run(request.with_fetcher(fetcher)).await
//! });
//! ```
//!
//! ## With a Tower Layer
//!
//! Any [`Layer`][crate::middleware::Layer] over
//! [`BoxedHook`][crate::middleware::BoxedHook] is a middleware:
//!
//! ```ignore
//! use swirl::middleware::{ConcurrencyLimitLayer, Middleware};
//!
//! let limit = Middleware::layer(ConcurrencyLimitLayer::new(4));
//! ```
//!
//! ## Ordering
//!
//! With `use_: [a, b, c]`, a call enters `a`, then `b`, then `c`, then the
//! terminal hook, and leaves in reverse order:
//!
//! ```text
//! enter a → enter b → enter c → terminal → exit c → exit b → exit a
//! ```
//!
//! ## Per-hook State
//!
//! Middleware are applied once per created hook. A layer that owns state,
//! like [`KeepPreviousDataLayer`][crate::middleware::KeepPreviousDataLayer],
//! gets a fresh slot for every hook:
//!
//! ```ignore
//! let a = swr.hook();
//! let b = swr.hook(); // does not see `a`'s previous data
//! ```
//!
//! ## Next Steps
//!
//! - [Chapter 3: Built-in Middleware][super::chapter_3] - What ships with swirl
