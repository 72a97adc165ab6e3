//! Schema-driven contract bindings for the Skein client.
//!
//! A [`binding::ContractBinding`] is built from nothing but a remote
//! contract's self-described schema. Its method table separates read-only
//! methods (answered by dry runs, cached by argument hash) from
//! state-mutating ones (queued as ordered sends), and every shared-state
//! change leaves through the injected store port.

pub mod binding;
pub mod config;
pub mod error;
pub mod executor;
pub mod method_table;
pub mod read_cache;
pub mod registry;
pub mod remote;
pub mod schema;
pub mod testing;
pub mod write_dispatcher;
