//! HTTP handlers for turkey CRUD.

pub mod turkey;
pub use turkey::*;
