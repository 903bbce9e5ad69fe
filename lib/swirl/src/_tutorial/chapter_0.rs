//! # Chapter 0: Getting Started
//!
//! Your first swirl hook in 5 minutes.
//!
//! ## What You'll Learn
//!
//! - Build a root [`Swr`][crate::Swr] scope
//! - Create a [`Hook`][crate::Hook] and call it with a key and a fetcher
//! - Read the data out of a [`SwrResponse`][crate::SwrResponse]
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! swirl = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Your First Hook
//!
//! ```ignore
//! use swirl::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     pub id: u64,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> swirl::Result<()> {
//!     let http = HttpFetcher::with_base_url("https://api.example.com")?;
//!     let swr = Swr::new();
//!     let hook = swr.hook();
//!
//!     let response = hook.call("/users/42", http.fetcher()).await?;
//!     let user: Option<User> = response.json()?;
//!     println!("User: {user:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## What Happens on a Call
//!
//! ```text
//! hook.call(key, fetcher)
//!     │
//!     ▼
//! middleware (none yet)
//!     │
//!     ▼
//! CacheHook ── null key ─────────────► DataSource::Empty
//!     │──── fresh cache entry ───────► DataSource::Cache
//!     └──── fetch (timeout, retry) ──► DataSource::Fetched
//! ```
//!
//! Calling the same key again within the dedupe interval (2 seconds by
//! default) is served from the cache without fetching.
//!
//! ## Any Async Function is a Fetcher
//!
//! [`HttpFetcher`][crate::HttpFetcher] is one fetcher among others. Wrap any
//! async function with [`Fetcher::new`][crate::Fetcher::new]:
//!
//! ```ignore
//! let fetcher = Fetcher::new(|key: Key| async move {
//!     let path = key.as_str().unwrap_or_default().to_string();
//!     tokio::fs::read(&path)
//!         .await
//!         .map(bytes::Bytes::from)
//!         .map_err(|e| swirl::Error::fetch(path, e.to_string()))
//! });
//! ```
//!
//! Report your own failures with [`Error::fetch`][crate::Error::fetch]: the
//! hook treats them as transient and retries them like connection errors.
//!
//! ## Next Steps
//!
//! - [Chapter 1: Configuration Scopes][super::chapter_1] - Options and nested scopes
