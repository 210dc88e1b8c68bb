//! qdep - source resolution and caching for qmake package dependencies
//!
//! Turns package descriptors such as `acme/widgets@1.2.0/src/widgets.pri` into
//! local, read-only source trees in a per-user cache, pinned to a tag or branch.
//! The binary in `main.rs` is a thin command line layer over this library.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod identity;
pub mod oracle;
pub mod overrides;
pub mod resolve;
pub mod update;

pub use config::Config;
pub use error::{QdepError, Result};
