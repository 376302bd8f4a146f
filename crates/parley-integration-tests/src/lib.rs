//! Integration test crate for the parley negotiation agent.
//!
//! This crate exists solely to run end-to-end negotiation scenarios against
//! the public API. It has no public API - all functionality is in the test modules.

#![forbid(unsafe_code)]
