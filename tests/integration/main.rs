//! Database-backed integration tests.
//!
//! These run against the PostgreSQL instance named by
//! `CLEARPORT_TEST_DATABASE_URL` and skip silently when that variable is
//! not set. Every test seeds its own rows and asserts only on rows keyed
//! by its own ids, so the suite is safe to run in parallel.

mod helpers;
mod payment_test;
mod shipment_test;
