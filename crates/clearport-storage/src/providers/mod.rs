//! Document storage providers.

pub mod local;
pub mod s3;
