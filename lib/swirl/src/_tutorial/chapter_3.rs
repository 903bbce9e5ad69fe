//! # Chapter 3: Built-in Middleware
//!
//! swirl ships a few middleware, all usable through [`SwrBuilder`][crate::SwrBuilder]
//! helpers or as plain layers in any scope.
//!
//! ## Logging
//!
//! ```ignore
//! let swr = Swr::builder()
//!     .with_logging()        // one span per call, INFO
//!     .with_fetch_logger()   // logs each actual fetch
//!     .build();
//! ```
//!
//! Use `.with_debug_logging()` to log at DEBUG level, config included.
//!
//! ## Keep Previous Data
//!
//! While a dependent key is still null, keep showing the last data:
//!
//! ```ignore
//! let swr = Swr::builder().with_keep_previous_data().build();
//! let hook = swr.hook();
//!
//! hook.call("/search?q=rust", fetcher.clone()).await?;   // Fetched
//! let r = hook.call(Key::null(), fetcher.clone()).await?;
//! assert_eq!(r.source(), DataSource::Previous);
//! assert!(r.is_lagging());
//! ```
//!
//! ## Serialize Key
//!
//! Structured keys become stable string keys, so `["/user", 1]` is cached
//! once. The fetcher still receives the structured key:
//!
//! ```ignore
//! let swr = Swr::builder().with_serialize_key().build();
//! let key = Key::array(["/user", "1"]);
//! hook.call(key, fetcher).await?;
//! ```
//!
//! ## Concurrency Limit
//!
//! ```ignore
//! let swr = Swr::builder().with_concurrency_limit(2).build();
//! ```
//!
//! ## Metrics
//!
//! Requires the `middleware-metrics` feature:
//!
//! ```ignore
//! let swr = Swr::builder().with_metrics().build();
//! ```
//!
//! | Metric                          | Type      | Labels   |
//! |---------------------------------|-----------|----------|
//! | `swr_hook_calls_total`          | counter   | `source` |
//! | `swr_hook_call_duration_seconds`| histogram |          |
//! | `swr_hook_calls_in_flight`      | gauge     |          |
//!
//! ## Ordering Built-ins
//!
//! Helpers append to the root `use_` list, so the call order is the order
//! they were added:
//!
//! ```ignore
//! let swr = Swr::builder()
//!     .with_logging()            // outermost: sees the original key
//!     .with_serialize_key()      // below: the cache sees string keys
//!     .with_keep_previous_data()
//!     .build();
//! ```
