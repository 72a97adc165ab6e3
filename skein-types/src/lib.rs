pub mod abi;
pub mod action;
pub mod constants;
pub mod error;
pub mod primitives;
pub mod schema;
