//! Shared numeric helpers used by the indicator modules.

pub mod math;
