pub use crate::app::App;
pub use aus_types::prelude::*;

// vim: ts=4
