//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module provides derive macro support for object-shaped sifter
//! records, generating the field accessor and field name constants from
//! struct annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
