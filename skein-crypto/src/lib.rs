pub mod args_hash;
pub mod hash;
