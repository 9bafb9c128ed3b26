//! Helper functions shared by content and templates

mod date;

pub use date::*;
