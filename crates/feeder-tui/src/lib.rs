//! Terminal control panel for the pet feeder.
//!
//! This crate provides a standalone binary wrapper around feeder-cli's TUI.
//! The actual implementation lives in `feeder-cli` with the `tui` feature
//! enabled; see [`feeder_cli::tui`].

pub use feeder_cli::tui;
