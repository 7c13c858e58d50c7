pub use aus_core::prelude::*;

// vim: ts=4
