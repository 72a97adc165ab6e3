//! The narrow store port the binding core reads from and dispatches to,
//! plus an in-memory implementation of it.

pub mod entry;
pub mod error;
pub mod memory;
pub mod traits;
