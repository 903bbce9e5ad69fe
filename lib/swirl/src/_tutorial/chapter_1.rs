//! # Chapter 1: Configuration Scopes
//!
//! Options and middleware are declared on scopes, and scopes nest.
//!
//! ## Options
//!
//! | Option                 | Default | Effect                                       |
//! |------------------------|---------|----------------------------------------------|
//! | `dedupe_interval`      | 2s      | Cache entries younger than this are served   |
//! | `error_retry_count`    | 3       | Retries after a retryable fetch error        |
//! | `error_retry_interval` | 5s      | Delay between retries                        |
//! | `fetch_timeout`        | none    | Timeout of a single fetch attempt            |
//! | `revalidate_if_stale`  | true    | When false, any cached entry is served as is |
//!
//! ```ignore
//! use std::time::Duration;
//! use swirl::Swr;
//!
//! let swr = Swr::builder()
//!     .dedupe_interval(Duration::from_secs(10))
//!     .error_retry_count(1)
//!     .fetch_timeout(Duration::from_secs(3))
//!     .build();
//! ```
//!
//! ## Nested Scopes
//!
//! [`Swr::scope`][crate::Swr::scope] nests a [`SwrConfig`][crate::SwrConfig]
//! inside an existing scope. The nested scope shares the root's cache.
//!
//! ```ignore
//! use swirl::{Swr, SwrConfig};
//!
//! let root = Swr::builder().with_logging().build();
//! let dashboard = root.scope(
//!     SwrConfig::new()
//!         .revalidate_if_stale(false)
//!         .layer(swirl::middleware::KeepPreviousDataLayer::new()),
//! );
//! ```
//!
//! Merging follows two rules:
//!
//! - an option set in the inner scope overrides the outer one
//! - the inner `use_` list is appended after the outer one
//!
//! So `dashboard` hooks run `LoggingLayer` first, then `KeepPreviousDataLayer`.
//!
//! ## Call-site Middleware
//!
//! [`Swr::hook_with`][crate::Swr::hook_with] adds middleware for one hook
//! only. They run after every scope middleware, right before the terminal hook:
//!
//! ```ignore
//! let hook = dashboard.hook_with(&[my_middleware]);
//! ```
//!
//! ## Writing the Cache Directly
//!
//! ```ignore
//! swr.mutate(&Key::from("/users/42"), bytes::Bytes::from(r#"{"id":42}"#));
//! swr.invalidate(&Key::from("/users/42"));
//! ```
//!
//! ## Next Steps
//!
//! - [Chapter 2: Writing Middleware][super::chapter_2] - Wrap the hook yourself
