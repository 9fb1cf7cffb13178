//! Common value types shared across crates.

pub mod pagination;
