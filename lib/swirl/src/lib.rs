//! Stale-while-revalidate data fetching hooks with composable middleware.
//!
//! A hook resolves a `(key, fetcher, config)` triple into data. Middleware
//! wrap the hook and may rewrite the key, swap the fetcher, patch the config
//! or post-process the response. Configuration scopes nest, and every scope
//! contributes middleware through its `use_` list.
//!
//! # Example
//!
//! ```ignore
//! use swirl::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let http = HttpFetcher::with_base_url("https://api.example.com")?;
//! let swr = Swr::builder().with_logging().build();
//!
//! let hook = swr.hook();
//! let user: Option<User> = hook.call("/users/42", http.fetcher()).await?.json()?;
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod cache;
mod config;
mod connector;
mod hook;
mod http_fetcher;
pub mod middleware;
pub mod prelude;
mod swr;
mod terminal;

// Re-export hook types
pub use cache::{Cache, CacheEntry};
pub use config::SwrConfig;
pub use hook::Hook;
pub use http_fetcher::{HttpFetcher, HttpFetcherConfig, HttpFetcherConfigBuilder};
pub use swr::{Swr, SwrBuilder};
pub use terminal::CacheHook;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use swirl_core::{
    Config, ConfigBuilder, DataSource, Error, Fetcher, HookRequest, Key, Result, SwrResponse,
    from_json, to_json,
};
