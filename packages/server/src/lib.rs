//! Hiroba chat relay.
//!
//! Tracks connected identities, fans out broadcast and private messages,
//! serves a bounded history and propagates typing and presence state to
//! many concurrent WebSocket connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
