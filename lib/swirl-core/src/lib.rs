//! Core types for the swirl stale-while-revalidate hook library.
//!
//! This crate provides the data shared by every hook and middleware:
//! - [`Key`] - Identity of a piece of remote data
//! - [`Fetcher`] - Type-erased async fetch function
//! - [`Config`] - Resolved per-call options
//! - [`HookRequest`] - The `(key, fetcher, config)` triple a hook receives
//! - [`SwrResponse`] and [`DataSource`] - Hook results
//! - [`Error`] and [`Result`] - Error handling
//! - [`to_json`] and [`from_json`] - JSON helpers for fetched data

mod body;
mod config;
mod error;
mod fetcher;
mod key;
pub mod prelude;
mod request;
mod response;

pub use body::{from_json, to_json};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use key::Key;
pub use request::HookRequest;
pub use response::{DataSource, SwrResponse};
