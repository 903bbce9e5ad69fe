//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions for easy
//! glob importing:
//!
//! ```ignore
//! use swirl::prelude::*;
//! ```

pub use crate::middleware::{Middleware, Next, from_fn};
pub use crate::{
    Config, DataSource, Error, Fetcher, Hook, HookRequest, HttpFetcher, Key, Result, Swr,
    SwrConfig, SwrResponse, from_json, to_json,
};
pub use serde::{Deserialize, Serialize};
