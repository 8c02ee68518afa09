//! Utilities shared by the Hiroba relay binary and its tests.

pub mod logger;
pub mod time;
