//! Purple Ball: a terminal platformer.
//!
//! The crate is split the same way the binary uses it:
//! - `entities`: pure data types, no logic
//! - `compute`: pure update functions over those types
//!
//! Rendering and terminal I/O live in the binary (`display` module).

pub mod compute;
pub mod entities;
