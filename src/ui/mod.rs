//! UI rendering module for the APOD viewer
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod entry_detail;
pub mod feed_list;
pub mod help_overlay;

pub use entry_detail::render as render_entry_detail;
pub use feed_list::render_feed_list;
pub use help_overlay::render as render_help_overlay;
