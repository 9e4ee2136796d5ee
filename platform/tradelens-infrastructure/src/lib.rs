pub mod codec;
pub mod keys;
pub mod memory;
pub mod persistence;
