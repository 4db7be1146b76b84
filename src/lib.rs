//! APOD viewer library
//!
//! Exposes the feed, cache, enrichment and UI modules to the binary and to
//! integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod enrich;
pub mod error;
pub mod feed;
pub mod range;
pub mod tasks;
pub mod ui;
