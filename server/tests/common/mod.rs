//! Shared helpers of the HTTP tests

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;
pub mod logging;

// vim: ts=4
