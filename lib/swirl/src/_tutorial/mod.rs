//! # Tutorial: Data Fetching Hooks with swirl
//!
//! Learn to fetch, cache and post-process remote data step by step.
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - Your first hook
//! 2. [Configuration Scopes][chapter_1] - Options, nesting, the `use_` list
//! 3. [Writing Middleware][chapter_2] - `from_fn`, Tower layers, ordering
//! 4. [Built-in Middleware][chapter_3] - Logging, laggy data, key serialization
//!
//! Ready? Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
pub mod chapter_3;
