//! Shared types, adapter traits, and core utilities for the hostpanel control panel.
//!
//! This crate holds everything the adapter implementations and the feature
//! crates need to agree on: the error type, identity capabilities, and the
//! storage adapter trait.

pub mod account_adapter;
pub mod error;
pub mod identity;
pub mod prelude;
pub mod types;
pub mod worker;

// vim: ts=4
