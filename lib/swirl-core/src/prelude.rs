//! Prelude module for convenient imports.
//!
//! ```ignore
//! use swirl_core::prelude::*;
//! ```

pub use crate::{
    Config, DataSource, Error, Fetcher, HookRequest, Key, Result, SwrResponse, from_json, to_json,
};
