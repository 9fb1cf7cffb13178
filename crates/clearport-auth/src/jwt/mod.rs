//! JWT access token handling.

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::JwtCodec;
