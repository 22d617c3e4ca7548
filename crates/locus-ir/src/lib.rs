//! Textual-IR primitives shared by the locus toolchain.
//!
//! The backend's intermediate representation is a parsable text format;
//! anything that serializes user-controlled names into it (column names,
//! field names, row keys) must escape them so the IR parser can read them
//! back. This crate owns that codec.

pub mod ident;

pub use ident::{escape_id, is_safe_id, unescape_id, UnescapeError, UnescapeErrorKind};
