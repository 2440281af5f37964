//! Input/output surface of the mosaic builder
//!
//! This module contains:
//! - Command-line parsing and the file driver
//! - Constants and runtime configuration
//! - Error types
//! - Source image loading
//! - Progress display
//! - Row presentation sinks

/// Command-line interface and file driver
pub mod cli;
/// Constants and runtime configuration
pub mod configuration;
/// Error types and constructors
pub mod error;
/// Source image loading
pub mod image;
/// Terminal progress display
pub mod progress;
/// Row presentation sinks
pub mod render;
