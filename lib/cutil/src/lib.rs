//! # CUtil - Common Utilities Library
//!
//! ## Features
//!
//! - `fs`: byte-size constants and formatting, path name helpers
//! - `time`: local time formatting

#[cfg(feature = "fs")]
pub mod fs;

#[cfg(feature = "time")]
pub mod time;
