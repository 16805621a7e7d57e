//! Library crate for userdeck.
//!
//! This crate exposes the building blocks of the TUI:
//! - Directory records and fake accounts (`model`)
//! - HTTP source and fetch cache (`api`)
//! - Filter and sort functions (`search`)
//! - Application state and update loop (`app`)
//! - Command-line flags (`cli`)
//! - Error and result types (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdeck` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod model;
pub mod search;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
