//! Result export (outer presentation layer).

pub mod export;
