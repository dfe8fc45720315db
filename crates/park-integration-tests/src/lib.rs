//! Integration test crate for the parking matcher.
//!
//! This crate exists solely to run tests that span `park-core`,
//! `park-market` and `park-persist`. It has no public API; all functionality
//! is in the test modules.

#![forbid(unsafe_code)]
