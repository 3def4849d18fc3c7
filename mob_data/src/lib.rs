//! Shared data model for the mob catalog.

pub mod defs;
pub mod patch;

pub use defs::*;
pub use patch::{MobField, MobPatch, PatchError};
