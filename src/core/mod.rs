//! Core application primitives (engine entry point, HTTP surface)

pub mod analyzer;
pub mod http;

pub use analyzer::*;
pub use http::*;
