//! Core infrastructure for the hostpanel control panel.
//!
//! Holds the pieces every feature crate shares: the application state, the
//! settings collection, request identity extraction, the event manager, the
//! audit log, form validation errors, and the reseller PHP permission rules.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod audit;
pub mod core_settings;
pub mod events;
pub mod extract;
pub mod middleware;
pub mod php_ini;
pub mod prelude;
pub mod settings;
pub mod validation;

pub use app::{App, AppState};
pub use extract::Auth;

// vim: ts=4
