//! Authentication primitives: JWT access tokens and password hashing.
//!
//! The rest of the application only ever sees an already-verified
//! `(user_id, role)` pair extracted from a bearer token.

pub mod jwt;
pub mod password;
