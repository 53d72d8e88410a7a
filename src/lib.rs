//! prores-dater - convert camera footage to ProRes 422 HQ and name it by
//! creation date.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod converter;
pub mod error;
pub mod naming;
pub mod scanner;

pub use converter::{Converter, FfmpegEngine, MediaEngine, RunSummary};
pub use error::ConvertError;
