//! In-memory directory tree addressable by slash-delimited paths.
//!
//! Layers, leaves first: [`domain`] (nodes, paths), [`application`] (the tree
//! service), [`infrastructure`] (wiring), [`cli`] (commands and sessions).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
