//! Decoder for the roster feed of a tabletop wargame army builder.
//!
//! The feed is an undocumented, positional text format. [`unit::Unit::decode`]
//! turns one raw record into a typed unit; [`roster::assemble`] walks the
//! faction/sector grid of a [`roster::RowSource`] and names the result from a
//! [`roster::NameSource`]. [`core_api`] wraps both behind an `Engine`/`Session`
//! pair working on persisted feed snapshots.

pub mod core_api;
pub mod duo;
pub mod fields;
pub mod language;
pub mod layout;
pub mod profile;
pub mod roster;
pub mod scalar;
pub mod stat;
pub mod unit;
