//! Utility functions and helpers.

/// Command line interface.
pub mod cli;
