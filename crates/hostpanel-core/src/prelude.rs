pub use crate::app::App;
pub use hostpanel_types::error::{ClResult, Error};
pub use hostpanel_types::types::{Timestamp, UserId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
