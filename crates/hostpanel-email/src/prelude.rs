pub use hostpanel_core::prelude::*;

// vim: ts=4
