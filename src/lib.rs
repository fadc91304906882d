//! Confirmation Service Library
//!
//! Accepts confirmation submissions against previously-uploaded image sessions:
//! a national insurance number or a mobile number, validated and translated from
//! raw JSON, sealed and persisted, and answered with a session-scoped view that
//! never echoes the confirmed value.
//!
//! This library module exposes the handler plumbing for use in integration tests.

pub mod app;
pub mod error;
pub mod payload;
pub mod routes;
pub mod settings;
pub mod storage;
pub mod telemetry;
pub mod test_support;
pub mod validation;
