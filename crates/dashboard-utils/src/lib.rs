//! Shared utilities for stock-dashboard
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and the display formatting shared by the chatbot
//! and the command-line tools.

pub mod format;
pub mod logging;

pub use format::{or_na, signed, signed_percent, thousands};
pub use logging::init_tracing;
